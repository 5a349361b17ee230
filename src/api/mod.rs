//! REST API module.
//!
//! Request and response bodies are plain JSON in the shapes the mini-app expects.

mod auth;
mod places;
mod users;

pub use auth::*;
pub use places::*;
pub use users::*;

use axum::Json;

use crate::errors::AppError;

/// Handler result: a JSON body or an error envelope.
pub type ApiResult<T> = Result<Json<T>, AppError>;
