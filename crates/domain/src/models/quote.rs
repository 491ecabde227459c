//! Rate lookup and quote request/response models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::favorite::ALL_CATEGORIES;
use super::rate::Rate;
use crate::services::fee::FeeBreakdown;
use crate::services::rate_resolution::{IssuerMatch, RateQuery};

/// Request payload for resolving the rate of a single gateway.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ResolveRateRequest {
    pub gateway_id: i64,
    pub card_type: String,
    pub card_issuer: String,
    pub category: String,

    #[validate(custom(function = "shared::validation::validate_non_negative"))]
    pub amount: Decimal,
}

impl From<ResolveRateRequest> for RateQuery {
    fn from(request: ResolveRateRequest) -> Self {
        Self {
            gateway_id: request.gateway_id,
            card_type: request.card_type,
            card_issuer: request.card_issuer,
            category: request.category,
            amount: request.amount,
        }
    }
}

/// Resolved rate with its computed fee.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolvedRateResponse {
    pub rate: Rate,
    pub issuer_match: IssuerMatch,
    pub fee: FeeBreakdown,
}

/// A transaction to quote across every gateway.
///
/// A missing category, or [`ALL_CATEGORIES`], quotes every category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct TransactionDescriptor {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub card_type: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub card_issuer: String,

    #[serde(default)]
    pub category: Option<String>,

    #[validate(custom(function = "shared::validation::validate_non_negative"))]
    pub amount: Decimal,
}

impl TransactionDescriptor {
    /// The single category requested, or `None` for every category.
    pub fn requested_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }
}

/// One gateway's quote for a descriptor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GatewayQuote {
    pub gateway_id: i64,
    pub gateway_name: String,
    pub company_id: i64,
    pub pg_partner: String,
    pub category: String,
    pub issuer_match: IssuerMatch,
    pub rate: Rate,
    pub fee: FeeBreakdown,
}

/// A (gateway, category) pair whose rates overlap for the amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IntegrityFault {
    pub gateway_id: i64,
    pub category: String,
    pub rate_ids: Vec<i64>,
}

/// Quotes for a descriptor, cheapest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QuoteComparison {
    pub descriptor: TransactionDescriptor,
    pub quotes: Vec<GatewayQuote>,
    pub integrity_faults: Vec<IntegrityFault>,
}

impl QuoteComparison {
    pub fn best(&self) -> Option<&GatewayQuote> {
        self.quotes.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn descriptor(category: Option<&str>) -> TransactionDescriptor {
        TransactionDescriptor {
            card_type: "CC".to_string(),
            card_issuer: "HDFC".to_string(),
            category: category.map(str::to_string),
            amount: dec!(500),
        }
    }

    #[test]
    fn test_requested_category() {
        assert_eq!(descriptor(Some("travel")).requested_category(), Some("travel"));
        assert_eq!(descriptor(None).requested_category(), None);
        assert_eq!(descriptor(Some(ALL_CATEGORIES)).requested_category(), None);
        assert_eq!(descriptor(Some("")).requested_category(), None);
    }

    #[test]
    fn test_resolve_request_into_query() {
        let request: ResolveRateRequest = serde_json::from_str(
            r#"{
                "gateway_id": 1,
                "card_type": "CC",
                "card_issuer": "HDFC",
                "category": "travel",
                "amount": 500
            }"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());

        let query = RateQuery::from(request);
        assert_eq!(query.gateway_id, 1);
        assert_eq!(query.amount, dec!(500));
    }

    #[test]
    fn test_resolve_request_rejects_negative_amount() {
        let request = ResolveRateRequest {
            gateway_id: 1,
            card_type: "CC".to_string(),
            card_issuer: "HDFC".to_string(),
            category: "travel".to_string(),
            amount: dec!(-0.01),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_descriptor_deserializes_without_category() {
        let descriptor: TransactionDescriptor = serde_json::from_str(
            r#"{"card_type": "Visa", "card_issuer": "HDFC", "amount": 1000}"#,
        )
        .unwrap();
        assert!(descriptor.validate().is_ok());
        assert!(descriptor.category.is_none());
    }
}
