//! Saved transaction descriptors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::quote::TransactionDescriptor;

/// Category sentinel meaning "every category".
pub const ALL_CATEGORIES: &str = "All Categories";

/// A saved transaction descriptor for repeated quoting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Favorite {
    pub id: i64,
    pub name: String,
    pub card_type: String,
    pub card_issuer: String,
    pub amount: Decimal,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn descriptor(&self) -> TransactionDescriptor {
        TransactionDescriptor {
            card_type: self.card_type.clone(),
            card_issuer: self.card_issuer.clone(),
            category: Some(self.category.clone()),
            amount: self.amount,
        }
    }
}

/// Fields of a favorite as written by create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewFavorite {
    pub name: String,
    pub card_type: String,
    pub card_issuer: String,
    pub amount: Decimal,
    pub category: String,
}

impl NewFavorite {
    pub fn with_id(self, id: i64, created_at: DateTime<Utc>) -> Favorite {
        Favorite {
            id,
            name: self.name,
            card_type: self.card_type,
            card_issuer: self.card_issuer,
            amount: self.amount,
            category: self.category,
            created_at,
        }
    }
}

/// Request payload for saving a favorite.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateFavoriteRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub card_type: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub card_issuer: String,

    #[validate(custom(function = "shared::validation::validate_non_negative"))]
    pub amount: Decimal,

    pub category: Option<String>,
}

impl From<CreateFavoriteRequest> for NewFavorite {
    fn from(request: CreateFavoriteRequest) -> Self {
        let category = request
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| ALL_CATEGORIES.to_string());

        Self {
            name: request.name.trim().to_string(),
            card_type: request.card_type,
            card_issuer: request.card_issuer,
            amount: request.amount,
            category,
        }
    }
}
