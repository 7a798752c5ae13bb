//! Modular common utilities shared across Play Economy crates.
//!
//! # Modules
//!
//! - `resilience`: clock abstraction, circuit breaker, retry policy and the
//!   telemetry events they emit
//! - `observability`: tracing subscriber setup for service binaries (feature
//!   `observability`, on by default)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod resilience;

#[cfg(feature = "observability")]
pub mod observability;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use resilience::{
    AttemptOutcome, BackoffStrategy, CallPermit, CircuitBreaker, CircuitBreakerConfig,
    CircuitBreakerMetrics, CircuitOpen, CircuitState, Clock, ConfigError, FailureClass, MockClock,
    NoopObserver, ResilienceEvent, ResilienceObserver, RetryAttempt, RetryDecision, RetryOutcome,
    RetryPolicy, SystemClock, TokioClock, TracingObserver,
};
