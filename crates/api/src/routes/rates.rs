//! Rate catalogue routes and rate resolution.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{Rate, RateFilter, RateRequest, ResolveRateRequest, ResolvedRateResponse};
use domain::services::{
    compute_fee, resolve_rate, validate_rate, RateQuery, ResolutionError,
};
use persistence::{RateWrite, StoreError};
use tracing::{info, warn};
use validator::Validate;

use super::ListResponse;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_rate_rejection, record_rate_resolution};

/// List rates matching every supplied filter.
///
/// GET /api/v1/rates?gateway_id=&card_type=&category=&card_issuer=
pub async fn list_rates(
    State(state): State<AppState>,
    Query(filter): Query<RateFilter>,
) -> Result<Json<ListResponse<Rate>>, ApiError> {
    let rates = state.store.list_rates(&filter).await?;
    Ok(Json(rates.into()))
}

/// GET /api/v1/rates/:rate_id
pub async fn get_rate(
    State(state): State<AppState>,
    Path(rate_id): Path<i64>,
) -> Result<Json<Rate>, ApiError> {
    state
        .store
        .get_rate(rate_id)
        .await?
        .map(Json)
        .ok_or_else(|| rate_not_found(rate_id))
}

/// Create a rate after consistency validation.
///
/// POST /api/v1/rates
pub async fn create_rate(
    State(state): State<AppState>,
    Json(request): Json<RateRequest>,
) -> Result<(StatusCode, Json<Rate>), ApiError> {
    request.validate()?;

    let rate = write_rate(&state, RateWrite::Create(request.into())).await?;
    info!(
        rate_id = rate.id,
        gateway_id = rate.gateway_id,
        card_type = %rate.card_type,
        card_issuer = %rate.card_issuer,
        category = %rate.category,
        "Rate created"
    );

    Ok((StatusCode::CREATED, Json(rate)))
}

/// Replace every field of a rate; the result is validated like a create.
///
/// PUT /api/v1/rates/:rate_id
pub async fn update_rate(
    State(state): State<AppState>,
    Path(rate_id): Path<i64>,
    Json(request): Json<RateRequest>,
) -> Result<Json<Rate>, ApiError> {
    request.validate()?;

    let write = RateWrite::Update {
        id: rate_id,
        candidate: request.into(),
    };
    let rate = match write_rate(&state, write).await {
        Err(ApiError::NotFound(_)) => return Err(rate_not_found(rate_id)),
        other => other?,
    };
    info!(rate_id, gateway_id = rate.gateway_id, "Rate updated");

    Ok(Json(rate))
}

/// DELETE /api/v1/rates/:rate_id
pub async fn delete_rate(
    State(state): State<AppState>,
    Path(rate_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_rate(rate_id).await? {
        return Err(rate_not_found(rate_id));
    }
    info!(rate_id, "Rate deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Resolve the rate applying to a transaction and price it.
///
/// POST /api/v1/rates/resolve
pub async fn resolve(
    State(state): State<AppState>,
    Json(request): Json<ResolveRateRequest>,
) -> Result<Json<ResolvedRateResponse>, ApiError> {
    request.validate()?;
    let query = RateQuery::from(request);

    let gateway = state.store.get_gateway(query.gateway_id).await?;
    let rates = state
        .store
        .list_rates(&RateFilter::for_gateway(query.gateway_id))
        .await?;

    match resolve_rate(&query, gateway.as_ref(), &rates) {
        Ok(matched) => {
            record_rate_resolution(matched.issuer_match.as_str());
            let fee = compute_fee(&matched.rate, query.amount, state.fee_policy)?;
            Ok(Json(ResolvedRateResponse {
                rate: matched.rate,
                issuer_match: matched.issuer_match,
                fee,
            }))
        }
        Err(failure) => {
            record_rate_resolution(failure.code());
            if let ResolutionError::AmbiguousRate(ids) = &failure {
                warn!(
                    gateway_id = query.gateway_id,
                    card_type = %query.card_type,
                    category = %query.category,
                    rate_ids = ?ids,
                    "Overlapping rates matched one transaction"
                );
            }
            Err(failure.into())
        }
    }
}

/// Run a rate write through the consistency validator inside the store.
async fn write_rate(state: &AppState, write: RateWrite) -> Result<Rate, ApiError> {
    let result = state
        .store
        .write_rate(write, &|ctx| validate_rate(ctx.validation_input()))
        .await;

    match result {
        Ok(rate) => Ok(rate),
        Err(StoreError::Rejected(rejection)) => {
            record_rate_rejection(rejection.code());
            warn!(reason = rejection.code(), "Rate write rejected: {}", rejection);
            Err(rejection.into())
        }
        Err(e) => Err(e.into()),
    }
}

fn rate_not_found(rate_id: i64) -> ApiError {
    ApiError::NotFound(format!("Rate {} not found", rate_id))
}
