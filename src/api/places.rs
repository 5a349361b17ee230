//! Place API endpoints.

use axum::{extract::State, Json};

use super::ApiResult;
use crate::errors::AppError;
use crate::models::{CreatePlaceRequest, PlaceListing, StatusResponse};
use crate::AppState;

/// POST /api/place - Share a new place.
pub async fn add_place(
    State(state): State<AppState>,
    Json(request): Json<CreatePlaceRequest>,
) -> ApiResult<StatusResponse> {
    validate_place(&request)?;

    let receipt = state.repo.insert_place(&request).await?;
    tracing::info!(
        place_id = receipt.place_id,
        user_id = request.user_id,
        places_count = receipt.places_count,
        level = %receipt.level,
        "Place added"
    );

    Ok(Json(StatusResponse::ok()))
}

/// GET /api/places - List all shared places.
pub async fn list_places(State(state): State<AppState>) -> ApiResult<Vec<PlaceListing>> {
    Ok(Json(state.repo.list_places().await?))
}

fn validate_place(request: &CreatePlaceRequest) -> Result<(), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Place name is required".to_string()));
    }
    if request.category.trim().is_empty() {
        return Err(AppError::Validation("Category is required".to_string()));
    }
    if !request.lat.is_finite() || !(-90.0..=90.0).contains(&request.lat) {
        return Err(AppError::Validation(
            "Latitude must be between -90 and 90".to_string(),
        ));
    }
    if !request.lon.is_finite() || !(-180.0..=180.0).contains(&request.lon) {
        return Err(AppError::Validation(
            "Longitude must be between -180 and 180".to_string(),
        ));
    }
    Ok(())
}
