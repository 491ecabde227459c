//! Rate settings routes.
//!
//! Rate writes validate against the settings the store holds at write time,
//! so a replacement applies to every later write without further steps.

use axum::{extract::State, Json};
use domain::models::{RateSettings, UpdateSettingsRequest};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/settings
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<RateSettings>, ApiError> {
    Ok(Json(state.store.get_settings().await?))
}

/// PUT /api/v1/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<RateSettings>, ApiError> {
    request.validate()?;

    let settings = state.store.replace_settings(request.into()).await?;
    info!(
        categories = settings.categories.len(),
        card_types = settings.card_types.len(),
        card_issuers = settings.card_issuers.len(),
        "Rate settings replaced"
    );

    Ok(Json(settings))
}
