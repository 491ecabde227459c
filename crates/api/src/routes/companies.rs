//! Service provider (company) routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{Company, CompanyRequest};
use tracing::info;
use validator::Validate;

use super::ListResponse;
use crate::app::AppState;
use crate::error::ApiError;

/// List companies.
///
/// GET /api/v1/companies
pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Company>>, ApiError> {
    let companies = state.store.list_companies().await?;
    Ok(Json(companies.into()))
}

/// GET /api/v1/companies/:company_id
pub async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> Result<Json<Company>, ApiError> {
    state
        .store
        .get_company(company_id)
        .await?
        .map(Json)
        .ok_or_else(|| company_not_found(company_id))
}

/// Create a company.
///
/// POST /api/v1/companies
pub async fn create_company(
    State(state): State<AppState>,
    Json(request): Json<CompanyRequest>,
) -> Result<(StatusCode, Json<Company>), ApiError> {
    request.validate()?;

    let company = state.store.create_company(request.into()).await?;
    info!(company_id = company.id, name = %company.name, "Company created");

    Ok((StatusCode::CREATED, Json(company)))
}

/// Replace a company.
///
/// PUT /api/v1/companies/:company_id
pub async fn update_company(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    Json(request): Json<CompanyRequest>,
) -> Result<Json<Company>, ApiError> {
    request.validate()?;

    let company = state
        .store
        .update_company(company_id, request.into())
        .await?
        .ok_or_else(|| company_not_found(company_id))?;
    info!(company_id, status = %company.status, "Company updated");

    Ok(Json(company))
}

/// Delete a company together with its gateways and their rates.
///
/// DELETE /api/v1/companies/:company_id
pub async fn delete_company(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_company(company_id).await? {
        return Err(company_not_found(company_id));
    }
    info!(company_id, "Company deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn company_not_found(company_id: i64) -> ApiError {
    ApiError::NotFound(format!("Company {} not found", company_id))
}
