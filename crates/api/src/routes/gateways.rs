//! Payment gateway routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{Gateway, GatewayRequest, ListGatewaysQuery};
use tracing::info;
use validator::Validate;

use super::ListResponse;
use crate::app::AppState;
use crate::error::ApiError;

/// List gateways, optionally for one company.
///
/// GET /api/v1/gateways?company_id=
pub async fn list_gateways(
    State(state): State<AppState>,
    Query(query): Query<ListGatewaysQuery>,
) -> Result<Json<ListResponse<Gateway>>, ApiError> {
    let gateways = state.store.list_gateways(query.company_id).await?;
    Ok(Json(gateways.into()))
}

/// GET /api/v1/gateways/:gateway_id
pub async fn get_gateway(
    State(state): State<AppState>,
    Path(gateway_id): Path<i64>,
) -> Result<Json<Gateway>, ApiError> {
    state
        .store
        .get_gateway(gateway_id)
        .await?
        .map(Json)
        .ok_or_else(|| gateway_not_found(gateway_id))
}

/// Create a gateway under an existing company.
///
/// POST /api/v1/gateways
pub async fn create_gateway(
    State(state): State<AppState>,
    Json(request): Json<GatewayRequest>,
) -> Result<(StatusCode, Json<Gateway>), ApiError> {
    request.validate()?;

    let gateway = state.store.create_gateway(request.into()).await?;
    info!(
        gateway_id = gateway.id,
        company_id = gateway.company_id,
        pg_partner = %gateway.pg_partner,
        "Gateway created"
    );

    Ok((StatusCode::CREATED, Json(gateway)))
}

/// Replace a gateway.
///
/// PUT /api/v1/gateways/:gateway_id
pub async fn update_gateway(
    State(state): State<AppState>,
    Path(gateway_id): Path<i64>,
    Json(request): Json<GatewayRequest>,
) -> Result<Json<Gateway>, ApiError> {
    request.validate()?;

    let gateway = state
        .store
        .update_gateway(gateway_id, request.into())
        .await?
        .ok_or_else(|| gateway_not_found(gateway_id))?;
    info!(gateway_id, status = %gateway.status, "Gateway updated");

    Ok(Json(gateway))
}

/// Delete a gateway and its rates.
///
/// DELETE /api/v1/gateways/:gateway_id
pub async fn delete_gateway(
    State(state): State<AppState>,
    Path(gateway_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_gateway(gateway_id).await? {
        return Err(gateway_not_found(gateway_id));
    }
    info!(gateway_id, "Gateway deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn gateway_not_found(gateway_id: i64) -> ApiError {
    ApiError::NotFound(format!("Gateway {} not found", gateway_id))
}
