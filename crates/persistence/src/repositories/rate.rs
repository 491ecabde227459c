//! Rate repository for database operations.
//!
//! Pool-based reads serve listings and resolution. Writes go through the
//! connection-scoped functions so callers can run lock, scope read and
//! insert inside one transaction.

use domain::models::{RateCandidate, RateFilter, RateScope};
use sqlx::{PgConnection, PgPool};

use crate::entities::RateEntity;
use crate::metrics::QueryTimer;

const RATE_COLUMNS: &str = "id, gateway_id, card_type, card_issuer, category, commission, surcharge, min_amount, max_amount";

/// Repository for rate-related database operations.
#[derive(Clone)]
pub struct RateRepository {
    pool: PgPool,
}

impl RateRepository {
    /// Creates a new RateRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List rates matching every present filter field.
    pub async fn list(&self, filter: &RateFilter) -> Result<Vec<RateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_rates");
        let sql = format!(
            r#"
            SELECT {RATE_COLUMNS}
            FROM rates
            WHERE ($1::BIGINT IS NULL OR gateway_id = $1)
              AND ($2::TEXT IS NULL OR card_type = $2)
              AND ($3::TEXT IS NULL OR category = $3)
              AND ($4::TEXT IS NULL OR card_issuer = $4)
            ORDER BY id
            "#
        );
        let result = sqlx::query_as::<_, RateEntity>(&sql)
            .bind(filter.gateway_id)
            .bind(filter.card_type.as_deref())
            .bind(filter.category.as_deref())
            .bind(filter.card_issuer.as_deref())
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<RateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_rate_by_id");
        let sql = format!("SELECT {RATE_COLUMNS} FROM rates WHERE id = $1");
        let result = sqlx::query_as::<_, RateEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_rate");
        let result = sqlx::query("DELETE FROM rates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    // =========================================================================
    // Transaction-scoped writes
    // =========================================================================

    /// Serialize writers of one scope until the surrounding transaction ends.
    pub async fn lock_scope(conn: &mut PgConnection, scope: &RateScope) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("lock_rate_scope");
        let (gateway_key, fields) = scope.lock_keys();
        let result = sqlx::query("SELECT pg_advisory_xact_lock($1, hashtext($2))")
            .bind(gateway_key)
            .bind(fields)
            .execute(conn)
            .await;
        timer.record();
        result.map(|_| ())
    }

    /// Whether a rate exists, locking its row for the rest of the transaction.
    pub async fn exists_for_update(conn: &mut PgConnection, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("find_rate_for_update");
        let result = sqlx::query_scalar::<_, i64>("SELECT id FROM rates WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await;
        timer.record();
        Ok(result?.is_some())
    }

    pub async fn list_scope(
        conn: &mut PgConnection,
        scope: &RateScope,
    ) -> Result<Vec<RateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_rate_scope");
        let sql = format!(
            r#"
            SELECT {RATE_COLUMNS}
            FROM rates
            WHERE gateway_id = $1 AND card_type = $2 AND category = $3 AND card_issuer = $4
            ORDER BY id
            "#
        );
        let result = sqlx::query_as::<_, RateEntity>(&sql)
            .bind(scope.gateway_id)
            .bind(&scope.card_type)
            .bind(&scope.category)
            .bind(&scope.card_issuer)
            .fetch_all(conn)
            .await;
        timer.record();
        result
    }

    pub async fn insert(
        conn: &mut PgConnection,
        candidate: &RateCandidate,
    ) -> Result<RateEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_rate");
        let sql = format!(
            r#"
            INSERT INTO rates (gateway_id, card_type, card_issuer, category,
                               commission, surcharge, min_amount, max_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RATE_COLUMNS}
            "#
        );
        let result = sqlx::query_as::<_, RateEntity>(&sql)
            .bind(candidate.gateway_id)
            .bind(&candidate.card_type)
            .bind(&candidate.card_issuer)
            .bind(&candidate.category)
            .bind(candidate.commission)
            .bind(candidate.surcharge)
            .bind(candidate.min_amount)
            .bind(candidate.max_amount)
            .fetch_one(conn)
            .await;
        timer.record();
        result
    }

    pub async fn replace(
        conn: &mut PgConnection,
        id: i64,
        candidate: &RateCandidate,
    ) -> Result<RateEntity, sqlx::Error> {
        let timer = QueryTimer::new("replace_rate");
        let sql = format!(
            r#"
            UPDATE rates
            SET gateway_id = $2, card_type = $3, card_issuer = $4, category = $5,
                commission = $6, surcharge = $7, min_amount = $8, max_amount = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {RATE_COLUMNS}
            "#
        );
        let result = sqlx::query_as::<_, RateEntity>(&sql)
            .bind(id)
            .bind(candidate.gateway_id)
            .bind(&candidate.card_type)
            .bind(&candidate.card_issuer)
            .bind(&candidate.category)
            .bind(candidate.commission)
            .bind(candidate.surcharge)
            .bind(candidate.min_amount)
            .bind(candidate.max_amount)
            .fetch_one(conn)
            .await;
        timer.record();
        result
    }
}
