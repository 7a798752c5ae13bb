//! Circuit breaker guarding a single downstream dependency.
//!
//! The breaker is a three-state machine:
//!
//! - **Closed**: calls pass; consecutive failures are counted and a success
//!   resets the count. Reaching `failure_threshold` opens the circuit.
//! - **Open**: calls are refused without touching the dependency until
//!   `cooldown` has elapsed since opening. The next call after that becomes
//!   the single trial and moves the breaker to half-open.
//! - **HalfOpen**: one trial is in flight and everything else is refused. The
//!   trial's outcome closes the circuit or re-opens it with a fresh cooldown.
//!
//! All transitions happen under one short-lived mutex. The downstream call
//! itself runs outside the lock.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::events::{NoopObserver, ResilienceEvent, ResilienceObserver};

/// Configuration validation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Configuration result type.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A call was refused because the breaker is open (or a trial is running).
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("circuit breaker is open, retry after {retry_after:?}")]
pub struct CircuitOpen {
    /// Time left until the breaker will admit a trial call.
    pub retry_after: Duration,
}

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Circuit is closed, allowing requests
    Closed,
    /// Circuit is open, rejecting requests
    Open,
    /// A single trial request is in flight
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "CLOSED"),
            CircuitState::Open => write!(f, "OPEN"),
            CircuitState::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

/// Configuration for circuit breaker behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit
    pub failure_threshold: u32,
    /// Time the circuit stays open before admitting a trial call
    pub cooldown: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self { failure_threshold: 3, cooldown: Duration::from_secs(15) }
    }
}

impl CircuitBreakerConfig {
    /// Create a configuration builder
    pub fn builder() -> CircuitBreakerConfigBuilder {
        CircuitBreakerConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.failure_threshold == 0 {
            return Err(ConfigError::Invalid {
                message: "failure_threshold must be greater than 0".to_string(),
            });
        }

        if self.cooldown.is_zero() {
            return Err(ConfigError::Invalid {
                message: "cooldown must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for CircuitBreakerConfig
#[derive(Debug, Default)]
pub struct CircuitBreakerConfigBuilder {
    config: CircuitBreakerConfig,
}

impl CircuitBreakerConfigBuilder {
    pub fn new() -> Self {
        Self { config: CircuitBreakerConfig::default() }
    }

    pub fn failure_threshold(mut self, threshold: u32) -> Self {
        self.config.failure_threshold = threshold;
        self
    }

    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.config.cooldown = cooldown;
        self
    }

    pub fn build(self) -> ConfigResult<CircuitBreakerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Point-in-time view of the breaker for health endpoints and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitBreakerMetrics {
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub opened_at: Option<Instant>,
    pub trial_in_flight: bool,
    pub rejected_calls: u64,
}

#[derive(Debug)]
struct BreakerCell {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

impl BreakerCell {
    fn closed() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            opened_at: None,
            trial_in_flight: false,
        }
    }

    fn open(&mut self, now: Instant) {
        self.state = CircuitState::Open;
        self.opened_at = Some(now);
        self.trial_in_flight = false;
    }

    fn close(&mut self) {
        *self = Self::closed();
    }
}

/// Circuit breaker for one downstream dependency.
///
/// Cheap to share: wrap it in an `Arc` and hand the same instance to every
/// caller of the dependency.
pub struct CircuitBreaker<C: Clock = SystemClock> {
    name: String,
    config: CircuitBreakerConfig,
    cell: Mutex<BreakerCell>,
    rejected_calls: AtomicU64,
    clock: C,
    observer: Arc<dyn ResilienceObserver>,
}

impl<C: Clock> fmt::Debug for CircuitBreaker<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

impl CircuitBreaker<SystemClock> {
    /// Create a breaker driven by the system clock.
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> ConfigResult<Self> {
        Self::with_clock(name, config, SystemClock)
    }
}

impl<C: Clock> CircuitBreaker<C> {
    /// Create a breaker with a custom clock (useful for testing).
    pub fn with_clock(
        name: impl Into<String>,
        config: CircuitBreakerConfig,
        clock: C,
    ) -> ConfigResult<Self> {
        config.validate()?;

        Ok(Self {
            name: name.into(),
            config,
            cell: Mutex::new(BreakerCell::closed()),
            rejected_calls: AtomicU64::new(0),
            clock,
            observer: Arc::new(NoopObserver),
        })
    }

    /// Report transitions to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn ResilienceObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Name of the guarded dependency.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Ask permission to call the dependency.
    ///
    /// Returns a permit that must be settled with [`CallPermit::succeed`] or
    /// [`CallPermit::fail`]. A permit dropped unsettled counts as a failure.
    pub fn try_acquire(&self) -> Result<CallPermit<'_, C>, CircuitOpen> {
        let now = self.clock.now();
        let (result, event) = {
            let mut cell = self.cell.lock();
            match cell.state {
                CircuitState::Closed => (Ok(false), None),
                CircuitState::Open => {
                    let opened_at = cell.opened_at.unwrap_or(now);
                    let elapsed = now.saturating_duration_since(opened_at);
                    if elapsed >= self.config.cooldown {
                        cell.state = CircuitState::HalfOpen;
                        cell.trial_in_flight = true;
                        (Ok(true), Some(ResilienceEvent::CircuitHalfOpened))
                    } else {
                        (Err(CircuitOpen { retry_after: self.config.cooldown - elapsed }), None)
                    }
                }
                // The trial flag is set whenever the breaker is half-open.
                CircuitState::HalfOpen => (Err(CircuitOpen { retry_after: Duration::ZERO }), None),
            }
        };

        if let Some(event) = event {
            self.emit(&event);
        }

        match result {
            Ok(trial) => {
                debug!(dependency = %self.name, trial, "circuit breaker admitted call");
                Ok(CallPermit { breaker: self, trial, settled: false })
            }
            Err(open) => {
                self.rejected_calls.fetch_add(1, Ordering::Relaxed);
                self.emit(&ResilienceEvent::CallRejected { retry_after: open.retry_after });
                Err(open)
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> CircuitState {
        self.cell.lock().state
    }

    /// Snapshot of state and counters.
    pub fn metrics(&self) -> CircuitBreakerMetrics {
        let cell = self.cell.lock();
        CircuitBreakerMetrics {
            state: cell.state,
            consecutive_failures: cell.consecutive_failures,
            opened_at: cell.opened_at,
            trial_in_flight: cell.trial_in_flight,
            rejected_calls: self.rejected_calls.load(Ordering::Relaxed),
        }
    }

    /// Force the breaker back to closed.
    pub fn reset(&self) {
        self.cell.lock().close();
        self.emit(&ResilienceEvent::CircuitClosed);
    }

    fn on_success(&self, trial: bool) {
        let event = {
            let mut cell = self.cell.lock();
            match cell.state {
                CircuitState::Closed => {
                    cell.consecutive_failures = 0;
                    None
                }
                CircuitState::HalfOpen if trial => {
                    cell.close();
                    Some(ResilienceEvent::CircuitClosed)
                }
                // Late results from calls admitted before the circuit opened.
                CircuitState::HalfOpen | CircuitState::Open => None,
            }
        };

        if let Some(event) = event {
            self.emit(&event);
        }
    }

    fn on_failure(&self, trial: bool) {
        let now = self.clock.now();
        let event = {
            let mut cell = self.cell.lock();
            match cell.state {
                CircuitState::Closed => {
                    cell.consecutive_failures = cell.consecutive_failures.saturating_add(1);
                    if cell.consecutive_failures >= self.config.failure_threshold {
                        cell.open(now);
                        Some(ResilienceEvent::CircuitOpened { cooldown: self.config.cooldown })
                    } else {
                        None
                    }
                }
                CircuitState::HalfOpen if trial => {
                    cell.open(now);
                    Some(ResilienceEvent::CircuitOpened { cooldown: self.config.cooldown })
                }
                CircuitState::HalfOpen | CircuitState::Open => None,
            }
        };

        if let Some(event) = event {
            self.emit(&event);
        }
    }

    fn emit(&self, event: &ResilienceEvent) {
        self.observer.on_event(&self.name, event);
    }
}

/// Permission to make one call through a [`CircuitBreaker`].
#[must_use = "a permit must be settled with succeed() or fail()"]
pub struct CallPermit<'a, C: Clock> {
    breaker: &'a CircuitBreaker<C>,
    trial: bool,
    settled: bool,
}

impl<C: Clock> CallPermit<'_, C> {
    /// Whether this permit is the half-open trial.
    pub fn is_trial(&self) -> bool {
        self.trial
    }

    /// Record a successful call.
    pub fn succeed(mut self) {
        self.settled = true;
        self.breaker.on_success(self.trial);
    }

    /// Record a failed call.
    pub fn fail(mut self) {
        self.settled = true;
        self.breaker.on_failure(self.trial);
    }
}

impl<C: Clock> Drop for CallPermit<'_, C> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.on_failure(self.trial);
        }
    }
}
