//! Rate entity (database row mapping).

use domain::models::Rate;
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database row mapping for the rates table.
#[derive(Debug, Clone, FromRow)]
pub struct RateEntity {
    pub id: i64,
    pub gateway_id: i64,
    pub card_type: String,
    pub card_issuer: String,
    pub category: String,
    pub commission: Decimal,
    pub surcharge: Decimal,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
}

impl From<RateEntity> for Rate {
    fn from(entity: RateEntity) -> Self {
        Self {
            id: entity.id,
            gateway_id: entity.gateway_id,
            card_type: entity.card_type,
            card_issuer: entity.card_issuer,
            category: entity.category,
            commission: entity.commission,
            surcharge: entity.surcharge,
            min_amount: entity.min_amount,
            max_amount: entity.max_amount,
        }
    }
}
