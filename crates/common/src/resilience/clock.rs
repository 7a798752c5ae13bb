//! Time abstraction for the resilience primitives.
//!
//! The circuit breaker never calls `Instant::now()` directly. Production code
//! uses [`SystemClock`] or [`TokioClock`]; tests either drive a [`MockClock`]
//! by hand or run under a paused tokio runtime with [`TokioClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of monotonic time.
pub trait Clock: Send + Sync + 'static {
    /// Current monotonic instant.
    fn now(&self) -> Instant;
}

/// Wall-clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that follows tokio's timer.
///
/// Under `#[tokio::test(start_paused = true)]` this clock advances together
/// with `tokio::time::sleep`, so breaker cooldowns and retry delays share one
/// timeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Clones share the same offset, so a test can keep one handle while the
/// breaker owns another.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl MockClock {
    /// Create a mock clock anchored at the current instant.
    pub fn new() -> Self {
        Self { start: Instant::now(), offset_nanos: Arc::new(AtomicU64::new(0)) }
    }

    /// Move time forward.
    pub fn advance(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.offset_nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    /// Time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn mock_clock_starts_at_zero_and_advances() {
        let clock = MockClock::new();
        let start = clock.now();
        assert_eq!(clock.elapsed(), Duration::ZERO);

        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now().duration_since(start), Duration::from_secs(5));
    }

    /// Clones observe the same timeline.
    #[test]
    fn mock_clock_clones_share_offset() {
        let clock = MockClock::new();
        let handle = clock.clone();

        handle.advance(Duration::from_millis(250));
        assert_eq!(clock.elapsed(), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_follows_paused_timer() {
        let clock = TokioClock;
        let before = clock.now();

        tokio::time::sleep(Duration::from_secs(15)).await;

        assert!(clock.now().duration_since(before) >= Duration::from_secs(15));
    }
}
