//! Rate settings entity (singleton row).

use chrono::{DateTime, Utc};
use domain::models::RateSettings;
use sqlx::FromRow;

/// Database row mapping for the rate_settings table.
#[derive(Debug, Clone, FromRow)]
pub struct RateSettingsEntity {
    pub categories: Vec<String>,
    pub card_types: Vec<String>,
    pub card_issuers: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<RateSettingsEntity> for RateSettings {
    fn from(entity: RateSettingsEntity) -> Self {
        Self {
            categories: entity.categories,
            card_types: entity.card_types,
            card_issuers: entity.card_issuers,
        }
    }
}
