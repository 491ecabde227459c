//! Cross-gateway quote comparison.

use axum::{extract::State, Json};
use domain::models::{QuoteComparison, RateFilter, TransactionDescriptor};
use domain::services::{compare_quotes, DomainRegistry};
use tracing::debug;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_quote_comparison;

/// Quote an ad-hoc transaction across every active gateway.
///
/// POST /api/v1/quotes
pub async fn compare(
    State(state): State<AppState>,
    Json(descriptor): Json<TransactionDescriptor>,
) -> Result<Json<QuoteComparison>, ApiError> {
    descriptor.validate()?;
    Ok(Json(quote(&state, descriptor).await?))
}

pub(crate) async fn quote(
    state: &AppState,
    descriptor: TransactionDescriptor,
) -> Result<QuoteComparison, ApiError> {
    let gateways = state.store.list_gateways(None).await?;
    let rates = state.store.list_rates(&RateFilter::default()).await?;
    let registry = DomainRegistry::from_settings(state.store.get_settings().await?);

    let comparison =
        compare_quotes(&descriptor, &gateways, &rates, &registry, state.fee_policy)?;
    record_quote_comparison(comparison.quotes.len(), comparison.integrity_faults.len());
    debug!(
        quotes = comparison.quotes.len(),
        best_gateway = ?comparison.best().map(|q| q.gateway_id),
        "Quote comparison computed"
    );

    Ok(comparison)
}
