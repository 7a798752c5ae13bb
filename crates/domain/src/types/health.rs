//! Health report served by each service's `/health` endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall health of a service
///
/// # Example
/// ```
/// use play_domain::{ComponentHealth, HealthStatus};
///
/// let status = HealthStatus::new("inventory")
///     .add_component(ComponentHealth::healthy("store"))
///     .add_component(ComponentHealth::unhealthy("catalog", "circuit OPEN"))
///     .finish();
///
/// assert!(!status.is_healthy);
/// assert_eq!(status.score, 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub service: String,
    pub is_healthy: bool,
    /// Fraction of healthy components, 1.0 when there are none
    pub score: f64,
    pub components: Vec<ComponentHealth>,
    pub checked_at: DateTime<Utc>,
}

impl HealthStatus {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            is_healthy: true,
            score: 1.0,
            components: Vec::new(),
            checked_at: Utc::now(),
        }
    }

    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.components.push(component);
        self
    }

    /// Compute score and verdict. Healthy only if every component is.
    pub fn finish(mut self) -> Self {
        if self.components.is_empty() {
            return self;
        }
        let healthy = self.components.iter().filter(|c| c.is_healthy).count();
        self.score = healthy as f64 / self.components.len() as f64;
        self.is_healthy = healthy == self.components.len();
        self
    }
}

/// Health of one dependency of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    /// e.g. "store", "catalog"
    pub name: String,
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }

    /// Attach a note without changing the verdict.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
