//! Tracing subscriber setup for the service binaries.
//!
//! Libraries in this workspace only emit `tracing` events. Binaries call
//! [`init_tracing`] once at startup. `RUST_LOG` overrides the default filter.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,play=debug";

/// Environment variable selecting [`LogFormat`].
pub const LOG_FORMAT_ENV: &str = "PLAY_LOG_FORMAT";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Compact,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "compact" | "text" | "pretty" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(ObservabilityError::UnknownFormat(other.to_string())),
        }
    }
}

impl LogFormat {
    /// Format named by `PLAY_LOG_FORMAT`, compact when unset.
    pub fn from_env() -> Result<Self, ObservabilityError> {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) => value.parse(),
            Err(_) => Ok(LogFormat::default()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("unknown log format '{0}', expected 'compact' or 'json'")]
    UnknownFormat(String),
    #[error("invalid log filter: {0}")]
    Filter(String),
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

fn env_filter() -> Result<EnvFilter, ObservabilityError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| ObservabilityError::Filter(e.to_string()))
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), ObservabilityError> {
    let filter = env_filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Compact => registry
            .with(fmt::layer().with_target(true).with_span_events(FmtSpan::NONE).compact())
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_ansi(false),
            )
            .try_init(),
    };

    installed.map_err(|e| ObservabilityError::AlreadyInstalled(e.to_string()))
}
