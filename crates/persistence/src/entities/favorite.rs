//! Favorite entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Favorite;
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database row mapping for the favorites table.
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteEntity {
    pub id: i64,
    pub name: String,
    pub card_type: String,
    pub card_issuer: String,
    pub amount: Decimal,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl From<FavoriteEntity> for Favorite {
    fn from(entity: FavoriteEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            card_type: entity.card_type,
            card_issuer: entity.card_issuer,
            amount: entity.amount,
            category: entity.category,
            created_at: entity.created_at,
        }
    }
}
