//! Resilience patterns for calls to remote dependencies.
//!
//! - **Circuit breaker**: stops hammering a dependency after repeated
//!   failures and admits a single trial once the cooldown elapses
//! - **Retry policy**: pure decision function with exponential backoff
//! - **Clock**: time source shared by both, swappable in tests
//! - **Events**: transitions and retry scheduling reported to an observer
//!
//! Nothing here knows about HTTP. The resilient client in `play-infra`
//! composes these pieces around a transport.

pub mod circuit_breaker;
pub mod clock;
pub mod events;
pub mod retry;

pub use circuit_breaker::{
    CallPermit, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerConfigBuilder,
    CircuitBreakerMetrics, CircuitOpen, CircuitState, ConfigError, ConfigResult,
};
pub use clock::{Clock, MockClock, SystemClock, TokioClock};
#[cfg(any(test, feature = "test-utils"))]
pub use events::RecordingObserver;
pub use events::{NoopObserver, ResilienceEvent, ResilienceObserver, TracingObserver};
pub use retry::{
    AttemptOutcome, BackoffStrategy, FailureClass, RetryAttempt, RetryDecision, RetryOutcome,
    RetryPolicy, RetryPolicyBuilder,
};
