//! Application context - wires the store, the catalog client and services

use std::sync::Arc;

use play_common::{CircuitBreaker, CircuitState};
use play_core::InventoryService;
use play_domain::constants::INVENTORY_COLLECTION;
use play_domain::{CatalogItemDto, ComponentHealth, Config, HealthStatus, InventoryItem, Result};
use play_infra::database::Store;
use play_infra::http::{HttpTransport, ResilientClient};
use tracing::info;

/// Client the inventory uses to read the catalog
pub type CatalogClient = ResilientClient<CatalogItemDto, HttpTransport>;

/// Everything the inventory's handlers need
pub struct AppContext {
    pub config: Config,
    pub store: Store,
    pub inventory: Arc<InventoryService>,
    pub catalog_breaker: Arc<CircuitBreaker>,
}

impl AppContext {
    /// Open the configured store and build the services on top of it.
    pub async fn new(config: Config) -> Result<Self> {
        let store = Store::open(&config.store, &config.service.service_name)?;
        Self::with_store(config, store).await
    }

    /// Build the context over an already opened store.
    pub async fn with_store(config: Config, store: Store) -> Result<Self> {
        let items = store.repository::<InventoryItem>(INVENTORY_COLLECTION).await?;

        let settings = &config.inventory.catalog_service;
        let transport = HttpTransport::builder(settings.url.clone())
            .user_agent(concat!("play-inventory/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(settings.timeout())
            .build()?;
        let catalog: CatalogClient = ResilientClient::from_settings("catalog", transport, settings)?;
        let catalog_breaker = Arc::clone(catalog.breaker());
        info!(url = %settings.url, "catalog client configured");

        let inventory = Arc::new(InventoryService::new(Arc::new(items), Arc::new(catalog)));

        Ok(Self { config, store, inventory, catalog_breaker })
    }

    pub async fn health_check(&self) -> HealthStatus {
        let store = match self.store.health_check().await {
            Ok(()) => ComponentHealth::healthy("store").with_message(self.store.kind()),
            Err(e) => ComponentHealth::unhealthy("store", e.to_string()),
        };

        let state = self.catalog_breaker.state();
        let catalog = match state {
            CircuitState::Open => ComponentHealth::unhealthy("catalog", format!("circuit {state}")),
            _ => ComponentHealth::healthy("catalog").with_message(format!("circuit {state}")),
        };

        HealthStatus::new(&self.config.service.service_name)
            .add_component(store)
            .add_component(catalog)
            .finish()
    }
}
