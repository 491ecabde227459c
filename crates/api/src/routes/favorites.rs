//! Saved transaction descriptors ("favorites").

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{CreateFavoriteRequest, Favorite, QuoteComparison};
use tracing::info;
use validator::Validate;

use super::quotes::quote;
use super::ListResponse;
use crate::app::AppState;
use crate::error::ApiError;

/// List favorites, newest first.
///
/// GET /api/v1/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Favorite>>, ApiError> {
    let favorites = state.store.list_favorites().await?;
    Ok(Json(favorites.into()))
}

/// POST /api/v1/favorites
pub async fn create_favorite(
    State(state): State<AppState>,
    Json(request): Json<CreateFavoriteRequest>,
) -> Result<(StatusCode, Json<Favorite>), ApiError> {
    request.validate()?;

    let favorite = state.store.create_favorite(request.into()).await?;
    info!(favorite_id = favorite.id, name = %favorite.name, "Favorite saved");

    Ok((StatusCode::CREATED, Json(favorite)))
}

/// DELETE /api/v1/favorites/:favorite_id
pub async fn delete_favorite(
    State(state): State<AppState>,
    Path(favorite_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_favorite(favorite_id).await? {
        return Err(favorite_not_found(favorite_id));
    }
    info!(favorite_id, "Favorite deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Re-run the comparison for a saved descriptor against current rates.
///
/// GET /api/v1/favorites/:favorite_id/quote
pub async fn quote_favorite(
    State(state): State<AppState>,
    Path(favorite_id): Path<i64>,
) -> Result<Json<QuoteComparison>, ApiError> {
    let favorite = state
        .store
        .get_favorite(favorite_id)
        .await?
        .ok_or_else(|| favorite_not_found(favorite_id))?;

    Ok(Json(quote(&state, favorite.descriptor()).await?))
}

fn favorite_not_found(favorite_id: i64) -> ApiError {
    ApiError::NotFound(format!("Favorite {} not found", favorite_id))
}
