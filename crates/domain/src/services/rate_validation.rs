//! Rate consistency validation.
//!
//! Runs on every rate create and update, before the store write, and rejects
//! candidates that would make rate resolution ambiguous. Checks run in order:
//! 1. The owning gateway exists
//! 2. Card type, card issuer and category are registry members
//! 3. The amount range is well formed
//! 4. No existing rate of the same scope intersects the candidate's range

use serde::Serialize;
use thiserror::Error;

use super::registry::DomainRegistry;
use crate::models::{Gateway, Rate, RateCandidate};

/// Rate field checked against the domain registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateField {
    CardType,
    CardIssuer,
    Category,
}

impl RateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateField::CardType => "card_type",
            RateField::CardIssuer => "card_issuer",
            RateField::Category => "category",
        }
    }
}

impl std::fmt::Display for RateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reason a rate write was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateRejection {
    #[error("Gateway {0} does not exist")]
    UnknownGateway(i64),

    #[error("Value '{value}' is not a configured {field}")]
    InvalidDomainValue { field: RateField, value: String },

    #[error("Invalid amount range: min_amount must be >= 0 and max_amount >= min_amount")]
    InvalidRange,

    #[error("Amount range overlaps rate {0}")]
    OverlappingRange(i64),
}

impl RateRejection {
    /// Stable reason code surfaced to clients.
    pub fn code(&self) -> &'static str {
        match self {
            RateRejection::UnknownGateway(_) => "unknown_gateway",
            RateRejection::InvalidDomainValue { .. } => "invalid_domain_value",
            RateRejection::InvalidRange => "invalid_range",
            RateRejection::OverlappingRange(_) => "overlapping_range",
        }
    }
}

/// Everything the validator looks at for one candidate.
#[derive(Debug, Clone, Copy)]
pub struct RateValidationInput<'a> {
    pub candidate: &'a RateCandidate,
    /// Id of the rate being replaced; `None` on create.
    pub rate_id: Option<i64>,
    /// The candidate's gateway as found by the store.
    pub gateway: Option<&'a Gateway>,
    pub registry: &'a DomainRegistry,
    /// Existing rates; rates outside the candidate's scope are ignored.
    pub existing: &'a [Rate],
}

/// Validate a rate candidate against the current catalogue.
pub fn validate_rate(input: RateValidationInput<'_>) -> Result<(), RateRejection> {
    let candidate = input.candidate;

    match input.gateway {
        Some(gateway) if gateway.id == candidate.gateway_id => {}
        _ => return Err(RateRejection::UnknownGateway(candidate.gateway_id)),
    }

    check_domain_values(candidate, input.registry)?;

    let range = candidate.range();
    if !range.is_well_formed() {
        return Err(RateRejection::InvalidRange);
    }

    let scope = candidate.scope();
    let conflict = input
        .existing
        .iter()
        .filter(|rate| Some(rate.id) != input.rate_id)
        .filter(|rate| rate.in_scope(&scope))
        .filter(|rate| rate.range().intersects(&range))
        .map(|rate| rate.id)
        .min();

    match conflict {
        Some(id) => Err(RateRejection::OverlappingRange(id)),
        None => Ok(()),
    }
}

fn check_domain_values(
    candidate: &RateCandidate,
    registry: &DomainRegistry,
) -> Result<(), RateRejection> {
    let checks = [
        (
            RateField::CardType,
            &candidate.card_type,
            registry.is_valid_card_type(&candidate.card_type),
        ),
        (
            RateField::CardIssuer,
            &candidate.card_issuer,
            registry.is_valid_card_issuer(&candidate.card_issuer),
        ),
        (
            RateField::Category,
            &candidate.category,
            registry.is_valid_category(&candidate.category),
        ),
    ];

    for (field, value, valid) in checks {
        if !valid {
            return Err(RateRejection::InvalidDomainValue {
                field,
                value: value.clone(),
            });
        }
    }
    Ok(())
}
