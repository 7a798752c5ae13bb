//! Structured telemetry emitted by the breaker and the retry loop.
//!
//! Observers are fire-and-forget: nothing in the resilience path waits on
//! them or inspects what they do.

use std::time::Duration;

use tracing::{info, warn};

/// A state change or scheduling decision worth reporting to operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResilienceEvent {
    /// A failed attempt will be retried after `delay`.
    RetryScheduled { attempt: u32, delay: Duration },
    /// The breaker tripped and will reject calls for `cooldown`.
    CircuitOpened { cooldown: Duration },
    /// The cooldown elapsed and a single trial call was admitted.
    CircuitHalfOpened,
    /// A trial succeeded and normal traffic resumed.
    CircuitClosed,
    /// A call was refused because the breaker is open.
    CallRejected { retry_after: Duration },
}

/// Receiver for [`ResilienceEvent`]s.
pub trait ResilienceObserver: Send + Sync {
    /// Handle one event for the named downstream dependency.
    fn on_event(&self, dependency: &str, event: &ResilienceEvent);
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ResilienceObserver for NoopObserver {
    fn on_event(&self, _dependency: &str, _event: &ResilienceEvent) {}
}

/// Observer that writes events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ResilienceObserver for TracingObserver {
    fn on_event(&self, dependency: &str, event: &ResilienceEvent) {
        match event {
            ResilienceEvent::RetryScheduled { attempt, delay } => warn!(
                dependency,
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "delaying {:.1}s before retry {}",
                delay.as_secs_f64(),
                attempt
            ),
            ResilienceEvent::CircuitOpened { cooldown } => warn!(
                dependency,
                cooldown_secs = cooldown.as_secs_f64(),
                "circuit opened for {:.1}s",
                cooldown.as_secs_f64()
            ),
            ResilienceEvent::CircuitHalfOpened => {
                info!(dependency, "circuit half-open, admitting trial call")
            }
            ResilienceEvent::CircuitClosed => info!(dependency, "circuit closed"),
            ResilienceEvent::CallRejected { retry_after } => warn!(
                dependency,
                retry_after_ms = u64::try_from(retry_after.as_millis()).unwrap_or(u64::MAX),
                "call rejected, circuit open"
            ),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use recording::RecordingObserver;

#[cfg(any(test, feature = "test-utils"))]
mod recording {
    use parking_lot::Mutex;

    use super::{ResilienceEvent, ResilienceObserver};

    /// Observer that keeps every event in memory for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingObserver {
        events: Mutex<Vec<ResilienceEvent>>,
    }

    impl RecordingObserver {
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of the events seen so far, oldest first.
        pub fn events(&self) -> Vec<ResilienceEvent> {
            self.events.lock().clone()
        }

        /// Delays of every scheduled retry, in order.
        pub fn retry_delays(&self) -> Vec<std::time::Duration> {
            self.events
                .lock()
                .iter()
                .filter_map(|event| match event {
                    ResilienceEvent::RetryScheduled { delay, .. } => Some(*delay),
                    _ => None,
                })
                .collect()
        }
    }

    impl ResilienceObserver for RecordingObserver {
        fn on_event(&self, _dependency: &str, event: &ResilienceEvent) {
            self.events.lock().push(event.clone());
        }
    }
}
