use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;

pub mod auth;
pub mod create;
pub mod info;
pub mod invite;

use crate::shares::ShareError;
use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", post(create::handler))
        .route("/auth", post(auth::handler))
        .route("/info/:share_id", get(info::handler))
        .route("/invite", post(invite::handler))
        .with_state(state)
}

impl From<JsonRejection> for ShareError {
    fn from(rejection: JsonRejection) -> Self {
        ShareError::Invalid(rejection.body_text())
    }
}

impl IntoResponse for ShareError {
    fn into_response(self) -> Response {
        let status = match &self {
            ShareError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ShareError::Forbidden => StatusCode::FORBIDDEN,
            ShareError::NotFound => StatusCode::NOT_FOUND,
            ShareError::Invalid(_) => StatusCode::BAD_REQUEST,
            ShareError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ShareError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("share request failed: {}", self);
        }

        // Storage and signing details stay in the log
        let message = match &self {
            ShareError::Unavailable(_) => "service unavailable".to_string(),
            ShareError::Signing(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
