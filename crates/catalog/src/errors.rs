//! HTTP rendering of domain errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use play_domain::PlayError;
use serde_json::json;
use tracing::error;

/// Error returned by handlers; renders as `{ "error": ..., "code": ... }`.
#[derive(Debug)]
pub struct ApiError(pub PlayError);

impl From<PlayError> for ApiError {
    fn from(err: PlayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code = self.0.code(), error = %self.0, "request failed");
        }
        let body = json!({ "error": self.0.to_string(), "code": self.0.code() });
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
