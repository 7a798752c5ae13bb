//! Application context - wires the store, repository and services

use std::sync::Arc;

use play_core::CatalogService;
use play_domain::constants::CATALOG_COLLECTION;
use play_domain::{ComponentHealth, Config, HealthStatus, Item, Result};
use play_infra::database::Store;
use tracing::info;

use crate::faults::FaultInjector;

/// Everything the catalog's handlers need
pub struct AppContext {
    pub config: Config,
    pub store: Store,
    pub catalog: Arc<CatalogService>,
    pub faults: Arc<FaultInjector>,
}

impl AppContext {
    /// Open the configured store and build the services on top of it.
    pub async fn new(config: Config) -> Result<Self> {
        let store = Store::open(&config.store, &config.service.service_name)?;
        Self::with_store(config, store).await
    }

    /// Build the context over an already opened store.
    pub async fn with_store(config: Config, store: Store) -> Result<Self> {
        let items = store.repository::<Item>(CATALOG_COLLECTION).await?;
        let catalog = Arc::new(CatalogService::new(Arc::new(items)));
        let faults = Arc::new(FaultInjector::new(config.catalog.fault_injection.clone()));

        if faults.is_enabled() {
            info!("fault injection enabled for GET /items");
        }

        Ok(Self { config, store, catalog, faults })
    }

    pub async fn health_check(&self) -> HealthStatus {
        let store = match self.store.health_check().await {
            Ok(()) => ComponentHealth::healthy("store").with_message(self.store.kind()),
            Err(e) => ComponentHealth::unhealthy("store", e.to_string()),
        };

        HealthStatus::new(&self.config.service.service_name).add_component(store).finish()
    }
}
