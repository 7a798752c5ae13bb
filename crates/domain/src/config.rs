//! Configuration structures
//!
//! Every section has serde defaults so a config file only needs to name what
//! it overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CATALOG_SERVICE_NAME, DEFAULT_CATALOG_BIND_ADDR, DEFAULT_CATALOG_URL, DEFAULT_POOL_SIZE,
};
use crate::impl_str_enum;

/// Top-level service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub service: ServiceSettings,
    pub store: StoreSettings,
    pub catalog: CatalogSettings,
    pub inventory: InventorySettings,
}

impl Config {
    /// Defaults for the named service listening on `bind_addr`.
    pub fn for_service(service_name: &str, bind_addr: &str) -> Self {
        Self {
            service: ServiceSettings {
                service_name: service_name.to_string(),
                bind_addr: bind_addr.to_string(),
            },
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub service_name: String,
    pub bind_addr: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            service_name: CATALOG_SERVICE_NAME.to_string(),
            bind_addr: DEFAULT_CATALOG_BIND_ADDR.to_string(),
        }
    }
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sqlite,
}

impl_str_enum!(StoreBackend {
    Memory => "memory",
    Sqlite => "sqlite",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    /// Database file; defaults to `<service_name>.db`
    pub path: Option<String>,
    pub pool_size: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { backend: StoreBackend::Memory, path: None, pool_size: DEFAULT_POOL_SIZE }
    }
}

impl StoreSettings {
    /// Database file for `service_name`, honouring an explicit `path`.
    pub fn database_path(&self, service_name: &str) -> String {
        self.path.clone().unwrap_or_else(|| format!("{service_name}.db"))
    }
}

/// Catalog-only settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CatalogSettings {
    /// Simulated slowness and failures; absent means disabled
    pub fault_injection: Option<FaultInjectionSettings>,
}

/// Simulated misbehaviour of the catalog's list endpoint.
///
/// Request numbers are 1-based and counted per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultInjectionSettings {
    /// Requests `1..=slow_requests` are delayed by `delay_ms`
    pub slow_requests: u32,
    /// Requests `1..=failing_requests` answer 500
    pub failing_requests: u32,
    pub delay_ms: u64,
}

impl Default for FaultInjectionSettings {
    fn default() -> Self {
        Self { slow_requests: 2, failing_requests: 5, delay_ms: 10_000 }
    }
}

impl FaultInjectionSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Inventory-only settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InventorySettings {
    pub catalog_service: ServiceCommunicationSettings,
}

/// How to reach a peer service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceCommunicationSettings {
    /// Base address, e.g. `http://localhost:5001`
    pub url: String,
    /// Per-attempt timeout
    pub timeout_secs: u64,
    pub resilience: ResilienceSettings,
}

impl Default for ServiceCommunicationSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            timeout_secs: 1,
            resilience: ResilienceSettings::default(),
        }
    }
}

impl ServiceCommunicationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Retry and circuit breaker tuning for one peer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceSettings {
    pub max_additional_attempts: u32,
    pub backoff_base: f64,
    pub backoff_unit_ms: u64,
    /// Cap on a single backoff delay; uncapped when absent
    pub max_delay_ms: Option<u64>,
    pub failure_threshold: u32,
    pub cooldown_secs: u64,
    /// Status codes worth retrying besides 5xx
    pub retryable_status_codes: Vec<u16>,
    /// Treat every 5xx as retryable
    pub retry_server_errors: bool,
}

impl Default for ResilienceSettings {
    fn default() -> Self {
        Self {
            max_additional_attempts: 5,
            backoff_base: 2.0,
            backoff_unit_ms: 1_000,
            max_delay_ms: None,
            failure_threshold: 3,
            cooldown_secs: 15,
            retryable_status_codes: vec![408, 429],
            retry_server_errors: true,
        }
    }
}

impl ResilienceSettings {
    /// Whether a response with `status` should be retried.
    pub fn is_retryable_status(&self, status: u16) -> bool {
        (self.retry_server_errors && (500..=599).contains(&status))
            || self.retryable_status_codes.contains(&status)
    }

    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }

    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay_ms.map(Duration::from_millis)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}
