//! Authentication endpoint.

use axum::{extract::State, Json};

use super::ApiResult;
use crate::models::{AuthRequest, AuthResponse};
use crate::AppState;

/// POST /auth - Register the Telegram user if new and issue their token.
pub async fn auth(
    State(state): State<AppState>,
    Json(request): Json<AuthRequest>,
) -> ApiResult<AuthResponse> {
    let created = state
        .repo
        .upsert_user(request.telegram_id, &request.stored_username())
        .await?;
    if created {
        tracing::info!(telegram_id = request.telegram_id, "Registered new user");
    }

    let token = state
        .tokens
        .generate(request.telegram_id, request.username.as_deref());

    Ok(Json(AuthResponse {
        token,
        user_id: request.telegram_id,
    }))
}
