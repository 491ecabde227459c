//! Rate settings repository.

use domain::models::RateSettings;
use sqlx::{PgConnection, PgPool};

use crate::entities::RateSettingsEntity;
use crate::metrics::QueryTimer;

/// Repository for the singleton rate settings row.
#[derive(Clone)]
pub struct RateSettingsRepository {
    pool: PgPool,
}

impl RateSettingsRepository {
    /// Creates a new RateSettingsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self) -> Result<Option<RateSettingsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_rate_settings");
        let result = sqlx::query_as::<_, RateSettingsEntity>(
            r#"
            SELECT categories, card_types, card_issuers, updated_at
            FROM rate_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Read the settings inside a transaction, holding off replacement until
    /// it ends.
    pub async fn find_for_share(
        conn: &mut PgConnection,
    ) -> Result<Option<RateSettingsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_rate_settings_for_share");
        let result = sqlx::query_as::<_, RateSettingsEntity>(
            r#"
            SELECT categories, card_types, card_issuers, updated_at
            FROM rate_settings
            WHERE id = 1
            FOR SHARE
            "#,
        )
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    /// Insert `defaults` unless the row already exists.
    pub async fn insert_if_missing(&self, defaults: &RateSettings) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("insert_default_rate_settings");
        let result = sqlx::query(
            r#"
            INSERT INTO rate_settings (id, categories, card_types, card_issuers)
            VALUES (1, $1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&defaults.categories)
        .bind(&defaults.card_types)
        .bind(&defaults.card_issuers)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    pub async fn replace(&self, settings: &RateSettings) -> Result<RateSettingsEntity, sqlx::Error> {
        let timer = QueryTimer::new("replace_rate_settings");
        let result = sqlx::query_as::<_, RateSettingsEntity>(
            r#"
            INSERT INTO rate_settings (id, categories, card_types, card_issuers)
            VALUES (1, $1, $2, $3)
            ON CONFLICT (id)
            DO UPDATE SET categories = $1, card_types = $2, card_issuers = $3, updated_at = NOW()
            RETURNING categories, card_types, card_issuers, updated_at
            "#,
        )
        .bind(&settings.categories)
        .bind(&settings.card_types)
        .bind(&settings.card_issuers)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
