//! Retrying, circuit-breaking client for a peer's JSON collections.
//!
//! Every logical fetch walks the same loop: ask the breaker for a permit,
//! run one transport attempt under the per-attempt timeout, settle the
//! permit, then let the [`RetryPolicy`] decide whether to sleep and go
//! again. The breaker and the retry counter are independent; a breaker that
//! opens between attempts ends the call with `CircuitOpen`.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use play_common::{
    AttemptOutcome, CircuitBreaker, CircuitBreakerConfig, CircuitOpen, Clock, ConfigError,
    FailureClass, ResilienceEvent, ResilienceObserver, RetryAttempt, RetryDecision, RetryOutcome,
    RetryPolicy, SystemClock, TracingObserver,
};
use play_core::RemoteCollectionClient;
use play_domain::{PlayError, ResilienceSettings, Result, ServiceCommunicationSettings};
use tracing::{debug, instrument, warn};

use super::client::{CollectionTransport, TransportError};

/// Remote collection client guarded by retries and a circuit breaker.
pub struct ResilientClient<T, Tr, C: Clock = SystemClock> {
    dependency: String,
    transport: Tr,
    breaker: Arc<CircuitBreaker<C>>,
    policy: RetryPolicy,
    attempt_timeout: Duration,
    classification: ResilienceSettings,
    observer: Arc<dyn ResilienceObserver>,
    _item: PhantomData<fn() -> T>,
}

impl<T, Tr> ResilientClient<T, Tr, SystemClock> {
    /// Build the client, its breaker and its retry policy from settings.
    pub fn from_settings(
        dependency: impl Into<String>,
        transport: Tr,
        settings: &ServiceCommunicationSettings,
    ) -> Result<Self> {
        Self::from_settings_with_clock(dependency, transport, settings, SystemClock)
    }
}

impl<T, Tr, C: Clock> ResilientClient<T, Tr, C> {
    /// Like [`from_settings`](ResilientClient::from_settings), reading breaker
    /// time from `clock`.
    pub fn from_settings_with_clock(
        dependency: impl Into<String>,
        transport: Tr,
        settings: &ServiceCommunicationSettings,
        clock: C,
    ) -> Result<Self> {
        if settings.timeout_secs == 0 {
            return Err(PlayError::Config("timeout_secs must be greater than 0".into()));
        }

        let dependency = dependency.into();
        let resilience = &settings.resilience;
        let observer: Arc<dyn ResilienceObserver> = Arc::new(TracingObserver);

        let breaker_config = CircuitBreakerConfig::builder()
            .failure_threshold(resilience.failure_threshold)
            .cooldown(resilience.cooldown())
            .build()
            .map_err(config_error)?;
        let breaker = CircuitBreaker::with_clock(dependency.clone(), breaker_config, clock)
            .map_err(config_error)?
            .with_observer(Arc::clone(&observer));

        let policy = RetryPolicy::builder()
            .max_additional_attempts(resilience.max_additional_attempts)
            .exponential(resilience.backoff_unit(), resilience.backoff_base, resilience.max_delay())
            .build()
            .map_err(config_error)?;

        Ok(Self::new(dependency, transport, Arc::new(breaker), policy)
            .with_attempt_timeout(settings.timeout())
            .with_classification(resilience.clone())
            .with_observer(observer))
    }

    /// Assemble a client from an existing breaker and policy.
    ///
    /// Uses a one second attempt timeout, the default status classification
    /// and a [`TracingObserver`] for retry events.
    pub fn new(
        dependency: impl Into<String>,
        transport: Tr,
        breaker: Arc<CircuitBreaker<C>>,
        policy: RetryPolicy,
    ) -> Self {
        let defaults = ServiceCommunicationSettings::default();
        Self {
            dependency: dependency.into(),
            transport,
            breaker,
            policy,
            attempt_timeout: defaults.timeout(),
            classification: defaults.resilience,
            observer: Arc::new(TracingObserver),
            _item: PhantomData,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Status codes treated as transient come from `settings`.
    pub fn with_classification(mut self, settings: ResilienceSettings) -> Self {
        self.classification = settings;
        self
    }

    /// Observer for retry events. Breaker events go to the breaker's own
    /// observer.
    pub fn with_observer(mut self, observer: Arc<dyn ResilienceObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn dependency(&self) -> &str {
        &self.dependency
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker<C>> {
        &self.breaker
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn classify(&self, error: &TransportError) -> FailureClass {
        match error {
            TransportError::Timeout | TransportError::Connect(_) => FailureClass::Transient,
            TransportError::Status { status, .. } if self.classification.is_retryable_status(*status) => {
                FailureClass::Transient
            }
            TransportError::Status { .. } | TransportError::Malformed(_) => FailureClass::Terminal,
        }
    }

    fn circuit_open(&self, open: CircuitOpen) -> PlayError {
        PlayError::CircuitOpen(format!(
            "{}, retry after {:.1}s",
            self.dependency,
            open.retry_after.as_secs_f64()
        ))
    }
}

impl<T, Tr, C> ResilientClient<T, Tr, C>
where
    T: Send + 'static,
    Tr: CollectionTransport<T>,
    C: Clock,
{
    /// Fetch `route`, returning the result together with every attempt made.
    pub async fn fetch_with_report(&self, route: &str) -> RetryOutcome<Vec<T>, PlayError> {
        let mut attempts: Vec<RetryAttempt> = Vec::new();
        let mut delay_before = Duration::ZERO;

        loop {
            let permit = match self.breaker.try_acquire() {
                Ok(permit) => permit,
                Err(open) => {
                    debug!(dependency = %self.dependency, "call rejected by open circuit");
                    return RetryOutcome { result: Err(self.circuit_open(open)), attempts };
                }
            };

            let attempt = u32::try_from(attempts.len()).unwrap_or(u32::MAX).saturating_add(1);
            let result = match tokio::time::timeout(
                self.attempt_timeout,
                self.transport.get_collection(route),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout),
            };

            let error = match result {
                Ok(items) => {
                    permit.succeed();
                    attempts.push(RetryAttempt {
                        attempt,
                        delay_before,
                        outcome: AttemptOutcome::Success,
                    });
                    debug!(dependency = %self.dependency, attempt, count = items.len(), "fetch succeeded");
                    return RetryOutcome { result: Ok(items), attempts };
                }
                Err(error) => {
                    permit.fail();
                    error
                }
            };

            let class = self.classify(&error);
            attempts.push(RetryAttempt {
                attempt,
                delay_before,
                outcome: match class {
                    FailureClass::Transient => AttemptOutcome::RetryableFailure,
                    FailureClass::Terminal => AttemptOutcome::TerminalFailure,
                },
            });

            match self.policy.decide(attempt, class) {
                RetryDecision::RetryAfter(delay) => {
                    self.observer.on_event(&self.dependency, &ResilienceEvent::RetryScheduled {
                        attempt,
                        delay,
                    });
                    tokio::time::sleep(delay).await;
                    delay_before = delay;
                }
                RetryDecision::GiveUp => {
                    warn!(
                        dependency = %self.dependency,
                        attempts = attempt,
                        error = %error,
                        "giving up on remote call"
                    );
                    return RetryOutcome {
                        result: Err(PlayError::RemoteCallFailed {
                            attempts: attempt,
                            reason: error.to_string(),
                        }),
                        attempts,
                    };
                }
            }
        }
    }
}

#[async_trait]
impl<T, Tr, C> RemoteCollectionClient<T> for ResilientClient<T, Tr, C>
where
    T: Send + 'static,
    Tr: CollectionTransport<T>,
    C: Clock,
{
    #[instrument(skip(self), fields(dependency = %self.dependency))]
    async fn fetch_collection(&self, route: &str) -> Result<Vec<T>> {
        self.fetch_with_report(route).await.into_result()
    }
}

fn config_error(err: ConfigError) -> PlayError {
    PlayError::Config(err.to_string())
}
