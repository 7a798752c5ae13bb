//! Simulated misbehaviour of the item list endpoint.
//!
//! Used to exercise the inventory service's retries and circuit breaker
//! against a real catalog. Disabled unless `catalog.fault_injection` is
//! configured.

use std::sync::atomic::{AtomicU32, Ordering};

use play_domain::{FaultInjectionSettings, PlayError, Result};
use tracing::warn;

/// Per-process fault schedule for `GET /items`.
#[derive(Debug, Default)]
pub struct FaultInjector {
    settings: Option<FaultInjectionSettings>,
    requests: AtomicU32,
}

impl FaultInjector {
    pub fn new(settings: Option<FaultInjectionSettings>) -> Self {
        Self { settings, requests: AtomicU32::new(0) }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.is_some()
    }

    /// Requests seen while enabled.
    pub fn request_count(&self) -> u32 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Count one list request and apply its scheduled fault.
    ///
    /// Requests `1..=slow_requests` are delayed; requests
    /// `1..=failing_requests` then fail with `Internal`.
    pub async fn on_list_request(&self) -> Result<()> {
        let Some(settings) = &self.settings else {
            return Ok(());
        };
        let request = self.requests.fetch_add(1, Ordering::Relaxed).saturating_add(1);

        if request <= settings.slow_requests {
            warn!(request, delay_ms = settings.delay_ms, "injecting delay");
            tokio::time::sleep(settings.delay()).await;
        }

        if request <= settings.failing_requests {
            warn!(request, "injecting failure");
            return Err(PlayError::Internal(format!("injected failure on request {request}")));
        }

        Ok(())
    }
}
