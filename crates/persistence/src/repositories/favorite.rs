//! Favorite repository for database operations.

use domain::models::NewFavorite;
use sqlx::PgPool;

use crate::entities::FavoriteEntity;
use crate::metrics::QueryTimer;

/// Repository for favorite-related database operations.
#[derive(Clone)]
pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    /// Creates a new FavoriteRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List favorites, newest first.
    pub async fn list(&self) -> Result<Vec<FavoriteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_favorites");
        let result = sqlx::query_as::<_, FavoriteEntity>(
            r#"
            SELECT id, name, card_type, card_issuer, amount, category, created_at
            FROM favorites
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<FavoriteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_favorite_by_id");
        let result = sqlx::query_as::<_, FavoriteEntity>(
            r#"
            SELECT id, name, card_type, card_issuer, amount, category, created_at
            FROM favorites
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn create(&self, favorite: &NewFavorite) -> Result<FavoriteEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_favorite");
        let result = sqlx::query_as::<_, FavoriteEntity>(
            r#"
            INSERT INTO favorites (name, card_type, card_issuer, amount, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, card_type, card_issuer, amount, category, created_at
            "#,
        )
        .bind(&favorite.name)
        .bind(&favorite.card_type)
        .bind(&favorite.card_issuer)
        .bind(favorite.amount)
        .bind(&favorite.category)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_favorite");
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
