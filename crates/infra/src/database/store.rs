//! Backend selection and collection wiring.

use std::sync::Arc;

use play_domain::{Entity, Result, StoreBackend, StoreSettings};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use super::document::{DocumentBackend, DocumentCollection, JsonCollection};
use super::manager::DbManager;
use super::memory::MemoryBackend;
use super::repository::DocumentRepository;
use super::sqlite::SqliteBackend;

/// Handle to the configured document backend.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn DocumentBackend>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("backend", &self.backend.kind()).finish()
    }
}

impl Store {
    /// Open the backend named in `settings`. SQLite databases default to
    /// `<service_name>.db`.
    pub fn open(settings: &StoreSettings, service_name: &str) -> Result<Self> {
        let store = match settings.backend {
            StoreBackend::Memory => Self::in_memory(),
            StoreBackend::Sqlite => {
                let path = settings.database_path(service_name);
                let db = DbManager::new(&path, settings.pool_size)?;
                Self::from_backend(Arc::new(SqliteBackend::new(Arc::new(db))))
            }
        };
        info!(backend = store.kind(), service = service_name, "document store opened");
        Ok(store)
    }

    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryBackend::new()))
    }

    pub fn from_backend(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    pub fn kind(&self) -> &'static str {
        self.backend.kind()
    }

    /// Typed handle to `name`, creating the collection if needed.
    pub async fn collection<T>(&self, name: &str) -> Result<Arc<dyn DocumentCollection<T>>>
    where
        T: Entity + Serialize + DeserializeOwned,
    {
        self.backend.ensure_collection(name).await?;
        Ok(Arc::new(JsonCollection::<T>::new(Arc::clone(&self.backend), name)))
    }

    /// Repository over `name` with the default update mode.
    pub async fn repository<T>(&self, name: &str) -> Result<DocumentRepository<T>>
    where
        T: Entity + Serialize + DeserializeOwned,
    {
        Ok(DocumentRepository::new(self.collection::<T>(name).await?))
    }

    pub async fn health_check(&self) -> Result<()> {
        self.backend.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use play_core::Repository;
    use play_domain::Item;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn opens_memory_backend_by_default() {
        let store = Store::open(&StoreSettings::default(), "catalog").unwrap();
        assert_eq!(store.kind(), "memory");
        store.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn sqlite_backend_persists_across_handles() {
        let dir = TempDir::new().unwrap();
        let settings = StoreSettings {
            backend: StoreBackend::Sqlite,
            path: Some(dir.path().join("catalog.db").to_string_lossy().into_owned()),
            pool_size: 2,
        };
        let potion = Item::new("Potion", "Restores HP", 5.0);

        {
            let store = Store::open(&settings, "catalog").unwrap();
            assert_eq!(store.kind(), "sqlite");
            let items = store.repository::<Item>("items").await.unwrap();
            items.create(potion.clone()).await.unwrap();
        }

        let reopened = Store::open(&settings, "catalog").unwrap();
        let items = reopened.repository::<Item>("items").await.unwrap();
        assert_eq!(items.get(&potion.id).await.unwrap(), Some(potion));
    }
}
