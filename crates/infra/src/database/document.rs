//! Document collections over a raw JSON backend.
//!
//! A [`DocumentBackend`] stores opaque JSON strings keyed by the entity's
//! storage key, one ordered list per collection. [`JsonCollection`] layers
//! typed encoding and [`Filter`] evaluation on top and is what repositories
//! talk to through the [`DocumentCollection`] port.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use play_core::Filter;
use play_domain::{Entity, EntityKey, PlayError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::InfraError;

/// A stored document and its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub key: String,
    pub body: String,
}

/// Untyped document storage.
///
/// `load_all` returns documents in insertion order.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Short backend name for logs and health output.
    fn kind(&self) -> &'static str;

    async fn ensure_collection(&self, collection: &str) -> Result<()>;

    async fn load_all(&self, collection: &str) -> Result<Vec<StoredDocument>>;

    /// The document stored under `key`, if any.
    async fn load(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>>;

    /// Insert a document. A taken key is a `Persistence` error.
    async fn insert(&self, collection: &str, document: StoredDocument) -> Result<()>;

    /// Replace the body stored under `key`. Returns whether a document matched.
    async fn replace(&self, collection: &str, key: &str, body: String) -> Result<bool>;

    /// Delete the document stored under `key`. Returns whether one was deleted.
    async fn delete(&self, collection: &str, key: &str) -> Result<bool>;

    async fn health_check(&self) -> Result<()>;
}

/// Typed collection handle used by the generic repository.
#[async_trait]
pub trait DocumentCollection<T: Entity>: Send + Sync {
    fn name(&self) -> &str;

    /// Entities matching `filter`; `Filter::all()` yields the whole collection.
    async fn find_all(&self, filter: &Filter<T>) -> Result<Vec<T>>;

    /// Entity stored under `id`. No other document is decoded.
    async fn find_by_id(&self, id: &T::Key) -> Result<Option<T>>;

    async fn insert_one(&self, entity: T) -> Result<()>;

    /// Replace the first entity matching `filter`. Returns whether one matched.
    async fn replace_one(&self, filter: &Filter<T>, entity: T) -> Result<bool>;

    /// Delete the first entity matching `filter`. Returns whether one was
    /// deleted.
    async fn delete_one(&self, filter: &Filter<T>) -> Result<bool>;
}

/// [`DocumentCollection`] storing `T` as JSON in a [`DocumentBackend`].
pub struct JsonCollection<T> {
    backend: Arc<dyn DocumentBackend>,
    name: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    pub fn new(backend: Arc<dyn DocumentBackend>, name: impl Into<String>) -> Self {
        Self { backend, name: name.into(), _entity: PhantomData }
    }

    fn decode(&self, document: &StoredDocument) -> Result<T> {
        serde_json::from_str(&document.body).map_err(|e| {
            PlayError::Persistence(format!(
                "corrupt document '{}' in collection '{}': {e}",
                document.key, self.name
            ))
        })
    }

    fn encode(entity: &T) -> Result<String> {
        serde_json::to_string(entity).map_err(|e| PlayError::from(InfraError::from(e)))
    }

    /// Key of the first stored document whose decoded entity matches.
    async fn first_match(&self, filter: &Filter<T>) -> Result<Option<String>> {
        for document in self.backend.load_all(&self.name).await? {
            if filter.matches(&self.decode(&document)?) {
                return Ok(Some(document.key));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl<T> DocumentCollection<T> for JsonCollection<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_all(&self, filter: &Filter<T>) -> Result<Vec<T>> {
        let mut matches = Vec::new();
        for document in self.backend.load_all(&self.name).await? {
            let entity = self.decode(&document)?;
            if filter.matches(&entity) {
                matches.push(entity);
            }
        }
        Ok(matches)
    }

    async fn find_by_id(&self, id: &T::Key) -> Result<Option<T>> {
        match self.backend.load(&self.name, &id.storage_key()).await? {
            Some(document) => self.decode(&document).map(Some),
            None => Ok(None),
        }
    }

    async fn insert_one(&self, entity: T) -> Result<()> {
        let document =
            StoredDocument { key: entity.id().storage_key(), body: Self::encode(&entity)? };
        self.backend.insert(&self.name, document).await
    }

    async fn replace_one(&self, filter: &Filter<T>, entity: T) -> Result<bool> {
        let Some(key) = self.first_match(filter).await? else {
            return Ok(false);
        };
        if key != entity.id().storage_key() {
            return Err(PlayError::Validation(format!(
                "replacement for '{key}' carries a different id '{}'",
                entity.id()
            )));
        }
        self.backend.replace(&self.name, &key, Self::encode(&entity)?).await
    }

    async fn delete_one(&self, filter: &Filter<T>) -> Result<bool> {
        match self.first_match(filter).await? {
            Some(key) => self.backend.delete(&self.name, &key).await,
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use play_domain::Item;

    use super::*;
    use crate::database::memory::MemoryBackend;

    fn collection() -> (Arc<MemoryBackend>, JsonCollection<Item>) {
        let backend = Arc::new(MemoryBackend::new());
        (backend.clone(), JsonCollection::new(backend, "items"))
    }

    #[tokio::test]
    async fn stores_entities_as_json_under_their_key() {
        let (backend, items) = collection();
        let potion = Item::new("Potion", "Restores HP", 5.0);

        items.insert_one(potion.clone()).await.unwrap();

        let stored = backend.load_all("items").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].key, potion.id.to_string());
        assert!(stored[0].body.contains("\"createdDate\""));
    }

    #[tokio::test]
    async fn replace_and_delete_report_matches() {
        let (_, items) = collection();
        let mut potion = Item::new("Potion", "Restores HP", 5.0);
        items.insert_one(potion.clone()).await.unwrap();

        potion.price = 6.0;
        assert!(items.replace_one(&Filter::by_id(potion.id), potion.clone()).await.unwrap());
        let stranger = Item::new("Ether", "Restores MP", 9.0);
        assert!(!items.replace_one(&Filter::by_id(stranger.id), stranger.clone()).await.unwrap());

        assert_eq!(items.find_all(&Filter::all()).await.unwrap(), vec![potion.clone()]);

        assert!(items.delete_one(&Filter::by_id(potion.id)).await.unwrap());
        assert!(!items.delete_one(&Filter::by_id(potion.id)).await.unwrap());
    }

    #[tokio::test]
    async fn replacement_must_keep_the_id() {
        let (_, items) = collection();
        let potion = Item::new("Potion", "Restores HP", 5.0);
        items.insert_one(potion.clone()).await.unwrap();

        let impostor = Item::new("Potion", "Restores HP", 5.0);
        let err = items.replace_one(&Filter::by_id(potion.id), impostor).await.unwrap_err();
        assert!(matches!(err, PlayError::Validation(_)));
    }

    #[tokio::test]
    async fn corrupt_documents_surface_as_persistence_errors() {
        let (backend, items) = collection();
        backend
            .insert("items", StoredDocument { key: "bad".into(), body: "{\"id\":".into() })
            .await
            .unwrap();

        let err = items.find_all(&Filter::all()).await.unwrap_err();
        assert!(matches!(err, PlayError::Persistence(msg) if msg.contains("corrupt document 'bad'")));
    }

    #[tokio::test]
    async fn key_lookup_decodes_only_the_requested_document() {
        let (backend, items) = collection();
        let potion = Item::new("Potion", "Restores HP", 5.0);
        items.insert_one(potion.clone()).await.unwrap();
        backend
            .insert("items", StoredDocument { key: "bad".into(), body: "{\"id\":".into() })
            .await
            .unwrap();

        assert_eq!(items.find_by_id(&potion.id).await.unwrap(), Some(potion));
        assert_eq!(items.find_by_id(&uuid::Uuid::new_v4()).await.unwrap(), None);
    }
}
