//! Retry policy for remote calls.
//!
//! [`RetryPolicy::decide`] is a pure function of how many attempts have been
//! made and how the last one failed. The async loop that sleeps and re-issues
//! calls lives with the client; this module only answers "again, and when?".

use std::time::Duration;

use super::circuit_breaker::{ConfigError, ConfigResult};

/// How a failed attempt should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Network error, timeout or a retryable status. Worth another try.
    Transient,
    /// Anything the next attempt would repeat, e.g. a 404 or a bad body.
    Terminal,
}

/// Verdict for a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait this long, then try again.
    RetryAfter(Duration),
    /// Stop and surface the failure.
    GiveUp,
}

/// Backoff strategies for retry delays
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Same delay before every retry
    Fixed(Duration),
    /// `unit * base^n` before retry `n`, optionally capped
    Exponential { unit: Duration, base: f64, max_delay: Option<Duration> },
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        BackoffStrategy::Exponential { unit: Duration::from_secs(1), base: 2.0, max_delay: None }
    }
}

impl BackoffStrategy {
    /// Delay before retry number `retry` (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        match self {
            BackoffStrategy::Fixed(delay) => *delay,
            BackoffStrategy::Exponential { unit, base, max_delay } => {
                let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
                let secs = unit.as_secs_f64() * base.powi(exponent);
                // Overflow and NaN saturate; the cap still applies afterwards.
                let delay = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
                match max_delay {
                    Some(cap) => delay.min(*cap),
                    None => delay,
                }
            }
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        match self {
            BackoffStrategy::Fixed(_) => Ok(()),
            BackoffStrategy::Exponential { base, .. } if !base.is_finite() || *base < 1.0 => {
                Err(ConfigError::Invalid {
                    message: format!("backoff base must be a finite number >= 1.0, got {base}"),
                })
            }
            BackoffStrategy::Exponential { .. } => Ok(()),
        }
    }
}

/// Retry policy: attempt budget plus backoff schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub max_additional_attempts: u32,
    pub backoff: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_additional_attempts: 5, backoff: BackoffStrategy::default() }
    }
}

impl RetryPolicy {
    /// Create a policy builder
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::new()
    }

    /// Validate the policy
    pub fn validate(&self) -> ConfigResult<()> {
        self.backoff.validate()
    }

    /// Total attempts the policy permits, first call included.
    pub fn max_attempts(&self) -> u32 {
        self.max_additional_attempts.saturating_add(1)
    }

    /// Decide what to do after `attempts_made` attempts, the last of which
    /// failed with `class`.
    ///
    /// Terminal failures never retry. Transient ones retry while
    /// `attempts_made <= max_additional_attempts`, waiting
    /// `backoff.delay(attempts_made)` first.
    pub fn decide(&self, attempts_made: u32, class: FailureClass) -> RetryDecision {
        match class {
            FailureClass::Terminal => RetryDecision::GiveUp,
            FailureClass::Transient if attempts_made == 0 => RetryDecision::GiveUp,
            FailureClass::Transient if attempts_made <= self.max_additional_attempts => {
                RetryDecision::RetryAfter(self.backoff.delay(attempts_made))
            }
            FailureClass::Transient => RetryDecision::GiveUp,
        }
    }
}

/// Builder for RetryPolicy
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    pub fn new() -> Self {
        Self { policy: RetryPolicy::default() }
    }

    pub fn max_additional_attempts(mut self, attempts: u32) -> Self {
        self.policy.max_additional_attempts = attempts;
        self
    }

    pub fn backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.policy.backoff = backoff;
        self
    }

    /// Exponential backoff `unit * base^n`.
    pub fn exponential(self, unit: Duration, base: f64, max_delay: Option<Duration>) -> Self {
        self.backoff(BackoffStrategy::Exponential { unit, base, max_delay })
    }

    pub fn build(self) -> ConfigResult<RetryPolicy> {
        self.policy.validate()?;
        Ok(self.policy)
    }
}

/// How one attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    RetryableFailure,
    TerminalFailure,
}

/// Record of a single attempt inside a retried call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAttempt {
    /// 1-based attempt number
    pub attempt: u32,
    /// Delay slept before this attempt (zero for the first)
    pub delay_before: Duration,
    pub outcome: AttemptOutcome,
}

/// Result of a retried call together with its attempt history.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    pub attempts: Vec<RetryAttempt>,
}

impl<T, E> RetryOutcome<T, E> {
    /// Number of attempts made.
    pub fn attempt_count(&self) -> u32 {
        u32::try_from(self.attempts.len()).unwrap_or(u32::MAX)
    }

    /// Sum of all backoff delays slept.
    pub fn total_delay(&self) -> Duration {
        self.attempts.iter().map(|attempt| attempt.delay_before).sum()
    }

    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}
