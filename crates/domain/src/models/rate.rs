//! Commission rate domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::amount_range::AmountRange;

/// Reserved card issuer matching any issuer without a rate of its own.
pub const FALLBACK_ISSUER: &str = "others";

/// A tiered commission rule of a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rate {
    pub id: i64,
    pub gateway_id: i64,
    pub card_type: String,
    pub card_issuer: String,
    pub category: String,
    /// Percentage of the transaction amount.
    pub commission: Decimal,
    /// Flat amount added on top of the commission.
    pub surcharge: Decimal,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
}

impl Rate {
    pub fn range(&self) -> AmountRange {
        AmountRange::new(self.min_amount, self.max_amount)
    }

    pub fn scope(&self) -> RateScope {
        RateScope {
            gateway_id: self.gateway_id,
            card_type: self.card_type.clone(),
            category: self.category.clone(),
            card_issuer: self.card_issuer.clone(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.card_issuer == FALLBACK_ISSUER
    }

    pub fn in_scope(&self, scope: &RateScope) -> bool {
        self.gateway_id == scope.gateway_id
            && self.card_type == scope.card_type
            && self.category == scope.category
            && self.card_issuer == scope.card_issuer
    }
}

/// A rate before it has been assigned an id by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateCandidate {
    pub gateway_id: i64,
    pub card_type: String,
    pub card_issuer: String,
    pub category: String,
    pub commission: Decimal,
    pub surcharge: Decimal,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
}

impl RateCandidate {
    pub fn range(&self) -> AmountRange {
        AmountRange::new(self.min_amount, self.max_amount)
    }

    pub fn scope(&self) -> RateScope {
        RateScope {
            gateway_id: self.gateway_id,
            card_type: self.card_type.clone(),
            category: self.category.clone(),
            card_issuer: self.card_issuer.clone(),
        }
    }

    pub fn with_id(self, id: i64) -> Rate {
        Rate {
            id,
            gateway_id: self.gateway_id,
            card_type: self.card_type,
            card_issuer: self.card_issuer,
            category: self.category,
            commission: self.commission,
            surcharge: self.surcharge,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        }
    }
}

/// The (gateway, card type, category, issuer) tuple within which rate
/// intervals must not overlap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateScope {
    pub gateway_id: i64,
    pub card_type: String,
    pub category: String,
    pub card_issuer: String,
}

impl RateScope {
    pub fn filter(&self) -> RateFilter {
        RateFilter {
            gateway_id: Some(self.gateway_id),
            card_type: Some(self.card_type.clone()),
            category: Some(self.category.clone()),
            card_issuer: Some(self.card_issuer.clone()),
        }
    }

    /// Key pair for a two-key advisory lock: the gateway id folded to 32
    /// bits, and the text fields length-prefixed so no two scopes of one
    /// gateway share a string.
    pub fn lock_keys(&self) -> (i32, String) {
        let gateway_key = (self.gateway_id ^ (self.gateway_id >> 32)) as i32;
        let fields = [&self.card_type, &self.category, &self.card_issuer]
            .iter()
            .map(|field| format!("{}:{}", field.len(), field))
            .collect::<Vec<_>>()
            .join("|");
        (gateway_key, fields)
    }
}

/// Filter for listing rates; every present field must match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateFilter {
    pub gateway_id: Option<i64>,
    pub card_type: Option<String>,
    pub category: Option<String>,
    pub card_issuer: Option<String>,
}

impl RateFilter {
    pub fn for_gateway(gateway_id: i64) -> Self {
        Self {
            gateway_id: Some(gateway_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, rate: &Rate) -> bool {
        self.gateway_id.map_or(true, |id| rate.gateway_id == id)
            && self
                .card_type
                .as_deref()
                .map_or(true, |v| rate.card_type == v)
            && self.category.as_deref().map_or(true, |v| rate.category == v)
            && self
                .card_issuer
                .as_deref()
                .map_or(true, |v| rate.card_issuer == v)
    }
}

/// Request payload for creating or replacing a rate.
///
/// Only sign checks on the fee components happen here; domain membership,
/// range sanity and overlap are checked by the rate validator.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RateRequest {
    pub gateway_id: i64,
    pub card_type: String,
    pub card_issuer: String,
    pub category: String,

    #[validate(custom(function = "shared::validation::validate_non_negative"))]
    pub commission: Decimal,

    #[validate(custom(function = "shared::validation::validate_non_negative"))]
    pub surcharge: Option<Decimal>,

    pub min_amount: Decimal,
    pub max_amount: Decimal,
}

impl From<RateRequest> for RateCandidate {
    fn from(request: RateRequest) -> Self {
        Self {
            gateway_id: request.gateway_id,
            card_type: request.card_type,
            card_issuer: request.card_issuer,
            category: request.category,
            commission: request.commission,
            surcharge: request.surcharge.unwrap_or(Decimal::ZERO),
            min_amount: request.min_amount,
            max_amount: request.max_amount,
        }
    }
}
