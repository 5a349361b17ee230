//! User profile endpoint.

use axum::{
    extract::{Path, State},
    Json,
};

use super::ApiResult;
use crate::errors::AppError;
use crate::models::User;
use crate::AppState;

/// GET /api/users/:telegram_id - Get a user's place count and level.
pub async fn get_user(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
) -> ApiResult<User> {
    match state.repo.get_user(telegram_id).await? {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::NotFound(format!("User {} not found", telegram_id))),
    }
}
