//! HTTP rendering of domain errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use play_domain::PlayError;
use serde_json::json;
use tracing::{error, warn};

/// Handler error, rendered as `{ "error": ..., "code": ... }`.
///
/// Catalog outages (`502`, `503`) are logged as warnings; the resilient
/// client has already reported the details.
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
        match &self.0 {
            PlayError::RemoteCallFailed { .. } | PlayError::CircuitOpen(_) => {
                warn!(code = self.0.code(), error = %self.0, "catalog unavailable");
            }
            err if status.is_server_error() => error!(code = err.code(), error = %err, "request failed"),
            _ => {}
        }
        (status, Json(json!({ "error": self.0.to_string(), "code": self.0.code() }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
