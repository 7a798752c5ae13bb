//! Error types used throughout the services

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the Play services
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PlayError {
    /// Caller supplied an absent entity or unusable input
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A remote call gave up after `attempts` attempts
    #[error("Remote call failed after {attempts} attempt(s): {reason}")]
    RemoteCallFailed { attempts: u32, reason: String },

    /// The circuit breaker refused the call without contacting the remote
    #[error("Circuit open for {0}")]
    CircuitOpen(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlayError {
    /// Short machine-readable code for API responses and log fields.
    pub fn code(&self) -> &'static str {
        match self {
            PlayError::Validation(_) => "validation",
            PlayError::NotFound(_) => "not_found",
            PlayError::RemoteCallFailed { .. } => "remote_call_failed",
            PlayError::CircuitOpen(_) => "circuit_open",
            PlayError::Persistence(_) => "persistence",
            PlayError::Config(_) => "config",
            PlayError::Internal(_) => "internal",
        }
    }

    /// HTTP status the services answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            PlayError::Validation(_) => 400,
            PlayError::NotFound(_) => 404,
            PlayError::RemoteCallFailed { .. } => 502,
            PlayError::CircuitOpen(_) => 503,
            PlayError::Persistence(_) | PlayError::Config(_) | PlayError::Internal(_) => 500,
        }
    }
}

/// Result type alias for Play operations
pub type Result<T> = std::result::Result<T, PlayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_separate_remote_failures_from_open_circuits() {
        let failed = PlayError::RemoteCallFailed { attempts: 1, reason: "HTTP 404".into() };
        assert_eq!(failed.status_code(), 502);
        assert_eq!(PlayError::CircuitOpen("catalog".into()).status_code(), 503);
        assert_eq!(PlayError::Validation("nil user".into()).status_code(), 400);
        assert_eq!(PlayError::Persistence("disk full".into()).status_code(), 500);
    }

    #[test]
    fn remote_call_failed_message_names_attempts() {
        let err = PlayError::RemoteCallFailed { attempts: 6, reason: "HTTP 503".into() };
        assert_eq!(err.to_string(), "Remote call failed after 6 attempt(s): HTTP 503");
        assert_eq!(err.code(), "remote_call_failed");
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(PlayError::NotFound("item".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "NotFound", "message": "item" }));
    }
}
