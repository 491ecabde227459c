//! Cross-gateway quote comparison.
//!
//! Prices a transaction descriptor on every active gateway, for the requested
//! category or for every configured category, and ranks the results.

use std::collections::HashMap;

use tracing::warn;

use super::fee::{compute_fee, FeeOverflow, FeePolicy};
use super::rate_resolution::{resolve_rate, RateQuery, ResolutionError};
use super::registry::DomainRegistry;
use crate::models::{
    Gateway, GatewayQuote, IntegrityFault, QuoteComparison, Rate, TransactionDescriptor,
};

/// Quote `descriptor` across `gateways`.
///
/// Inactive gateways are skipped. Misses are omitted; ambiguous outcomes are
/// returned as integrity faults rather than quotes. Quotes are ordered by
/// total fee, then gateway id, then category. Fails when any matched fee
/// overflows.
pub fn compare_quotes(
    descriptor: &TransactionDescriptor,
    gateways: &[Gateway],
    rates: &[Rate],
    registry: &DomainRegistry,
    fee_policy: FeePolicy,
) -> Result<QuoteComparison, FeeOverflow> {
    let categories: Vec<&str> = match descriptor.requested_category() {
        Some(category) => vec![category],
        None => registry.categories().iter().map(String::as_str).collect(),
    };

    let mut rates_by_gateway: HashMap<i64, Vec<Rate>> = HashMap::new();
    for rate in rates {
        rates_by_gateway
            .entry(rate.gateway_id)
            .or_default()
            .push(rate.clone());
    }

    let mut quotes = Vec::new();
    let mut integrity_faults = Vec::new();

    for gateway in gateways.iter().filter(|g| g.status.is_active()) {
        let gateway_rates = rates_by_gateway
            .get(&gateway.id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for category in &categories {
            let query = RateQuery {
                gateway_id: gateway.id,
                card_type: descriptor.card_type.clone(),
                card_issuer: descriptor.card_issuer.clone(),
                category: category.to_string(),
                amount: descriptor.amount,
            };

            match resolve_rate(&query, Some(gateway), gateway_rates) {
                Ok(matched) => {
                    let fee = compute_fee(&matched.rate, descriptor.amount, fee_policy)?;
                    quotes.push(GatewayQuote {
                        gateway_id: gateway.id,
                        gateway_name: gateway.name.clone(),
                        company_id: gateway.company_id,
                        pg_partner: gateway.pg_partner.clone(),
                        category: query.category,
                        issuer_match: matched.issuer_match,
                        rate: matched.rate,
                        fee,
                    });
                }
                Err(ResolutionError::AmbiguousRate(rate_ids)) => {
                    warn!(
                        gateway_id = gateway.id,
                        category = %query.category,
                        rate_ids = ?rate_ids,
                        "Overlapping rates found while comparing quotes"
                    );
                    integrity_faults.push(IntegrityFault {
                        gateway_id: gateway.id,
                        category: query.category,
                        rate_ids,
                    });
                }
                Err(ResolutionError::NoApplicableRate) | Err(ResolutionError::UnknownGateway(_)) => {}
            }
        }
    }

    quotes.sort_by(|a, b| {
        a.fee
            .total_fee
            .cmp(&b.fee.total_fee)
            .then(a.gateway_id.cmp(&b.gateway_id))
            .then_with(|| a.category.cmp(&b.category))
    });

    Ok(QuoteComparison {
        descriptor: descriptor.clone(),
        quotes,
        integrity_faults,
    })
}
