//! Conversions from external infrastructure errors into domain errors.

use play_domain::PlayError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PlayError);

impl From<InfraError> for PlayError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PlayError> for InfraError {
    fn from(value: PlayError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoPlayError {
    fn into_play(self) -> PlayError;
}

/// SQLite extended result codes for key violations.
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/// Whether `err` is a primary-key or unique constraint violation.
pub fn is_unique_violation(err: &SqlError) -> bool {
    matches!(
        err,
        SqlError::SqliteFailure(e, _)
            if e.code == rusqlite::ffi::ErrorCode::ConstraintViolation
                && matches!(e.extended_code, SQLITE_CONSTRAINT_PRIMARYKEY | SQLITE_CONSTRAINT_UNIQUE)
    )
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → PlayError */
/* -------------------------------------------------------------------------- */

impl IntoPlayError for SqlError {
    fn into_play(self) -> PlayError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        if is_unique_violation(&self) {
            return PlayError::Persistence("duplicate key".into());
        }

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => PlayError::Persistence("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        PlayError::Persistence("database is locked".into())
                    }
                    ErrorCode::CannotOpen => {
                        PlayError::Persistence(format!("unable to open database: {message}"))
                    }
                    _ => PlayError::Persistence(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                PlayError::Persistence(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                PlayError::Persistence(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => PlayError::Persistence(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => PlayError::Persistence("invalid SQL query".into()),
            other => PlayError::Persistence(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_play())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → PlayError */
/* -------------------------------------------------------------------------- */

impl IntoPlayError for r2d2::Error {
    fn into_play(self) -> PlayError {
        PlayError::Persistence(format!("connection pool: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_play())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → PlayError */
/* -------------------------------------------------------------------------- */

impl IntoPlayError for serde_json::Error {
    fn into_play(self) -> PlayError {
        PlayError::Persistence(format!("document encoding: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_play())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → PlayError */
/* -------------------------------------------------------------------------- */

impl IntoPlayError for tokio::task::JoinError {
    fn into_play(self) -> PlayError {
        PlayError::Internal(format!("blocking task failed: {self}"))
    }
}

impl From<tokio::task::JoinError> for InfraError {
    fn from(value: tokio::task::JoinError) -> Self {
        InfraError(value.into_play())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PlayError */
/* -------------------------------------------------------------------------- */

impl IntoPlayError for HttpError {
    fn into_play(self) -> PlayError {
        if self.is_builder() {
            return PlayError::Config(format!("invalid HTTP client configuration: {self}"));
        }

        if let Some(status) = self.status() {
            return PlayError::RemoteCallFailed {
                attempts: 1,
                reason: format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("unknown status")
                ),
            };
        }

        PlayError::RemoteCallFailed { attempts: 1, reason: self.to_string() }
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_play())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
