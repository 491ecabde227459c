//! Rate resolution engine.
//!
//! Selects the single rate that applies to a transaction on a given gateway.
//!
//! ## Resolution Rules
//!
//! 1. Candidate pool: rates of the gateway with the query's card type and category
//! 2. A rate of the query's own issuer containing the amount wins
//! 3. Otherwise a rate of the fallback issuer (`others`) containing the amount
//! 4. More than one containing rate in the winning partition is an integrity
//!    fault and is reported, never resolved by picking one
//!
//! Amount ranges are closed on both ends.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Gateway, Rate, FALLBACK_ISSUER};

/// A transaction to price on one gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuery {
    pub gateway_id: i64,
    pub card_type: String,
    pub card_issuer: String,
    pub category: String,
    pub amount: Decimal,
}

/// Which issuer partition produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuerMatch {
    /// Rate of the query's own issuer.
    Exact,
    /// Rate of the fallback issuer.
    Fallback,
}

impl IssuerMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssuerMatch::Exact => "exact",
            IssuerMatch::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for IssuerMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The resolved rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateMatch {
    pub rate: Rate,
    pub issuer_match: IssuerMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("Gateway {0} does not exist")]
    UnknownGateway(i64),

    #[error("No rate applies to this transaction")]
    NoApplicableRate,

    #[error("Rates {0:?} all apply to this transaction")]
    AmbiguousRate(Vec<i64>),
}

impl ResolutionError {
    pub fn code(&self) -> &'static str {
        match self {
            ResolutionError::UnknownGateway(_) => "unknown_gateway",
            ResolutionError::NoApplicableRate => "no_applicable_rate",
            ResolutionError::AmbiguousRate(_) => "ambiguous_rate",
        }
    }
}

/// Resolve the rate applying to `query`.
///
/// `rates` may hold rates of other gateways; they are ignored. `gateway` is
/// the query's gateway as looked up by the caller.
pub fn resolve_rate(
    query: &RateQuery,
    gateway: Option<&Gateway>,
    rates: &[Rate],
) -> Result<RateMatch, ResolutionError> {
    match gateway {
        Some(gateway) if gateway.id == query.gateway_id => {}
        _ => return Err(ResolutionError::UnknownGateway(query.gateway_id)),
    }

    let pool: Vec<&Rate> = rates
        .iter()
        .filter(|rate| {
            rate.gateway_id == query.gateway_id
                && rate.card_type == query.card_type
                && rate.category == query.category
                && rate.range().contains(query.amount)
        })
        .collect();

    if let Some(rate) = pick(&pool, &query.card_issuer)? {
        return Ok(RateMatch {
            rate: rate.clone(),
            issuer_match: IssuerMatch::Exact,
        });
    }

    if let Some(rate) = pick(&pool, FALLBACK_ISSUER)? {
        return Ok(RateMatch {
            rate: rate.clone(),
            issuer_match: IssuerMatch::Fallback,
        });
    }

    Err(ResolutionError::NoApplicableRate)
}

/// The single pool rate of `issuer`, if any.
fn pick<'a>(pool: &[&'a Rate], issuer: &str) -> Result<Option<&'a Rate>, ResolutionError> {
    let mut hits: Vec<&Rate> = pool
        .iter()
        .copied()
        .filter(|rate| rate.card_issuer == issuer)
        .collect();

    match hits.len() {
        0 => Ok(None),
        1 => Ok(hits.pop()),
        _ => {
            let mut ids: Vec<i64> = hits.iter().map(|rate| rate.id).collect();
            ids.sort_unstable();
            Err(ResolutionError::AmbiguousRate(ids))
        }
    }
}
