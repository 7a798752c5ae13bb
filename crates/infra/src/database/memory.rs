//! In-process document backend.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use play_domain::{PlayError, Result};

use super::document::{DocumentBackend, StoredDocument};

/// Document backend holding every collection in memory.
///
/// Each collection is a vector in insertion order; lookups are linear.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn ensure_collection(&self, collection: &str) -> Result<()> {
        self.collections.write().entry(collection.to_string()).or_default();
        Ok(())
    }

    async fn load_all(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        Ok(self.collections.read().get(collection).cloned().unwrap_or_default())
    }

    async fn load(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|document| document.key == key))
            .cloned())
    }

    async fn insert(&self, collection: &str, document: StoredDocument) -> Result<()> {
        let mut collections = self.collections.write();
        let documents = collections.entry(collection.to_string()).or_default();
        if documents.iter().any(|existing| existing.key == document.key) {
            return Err(PlayError::Persistence(format!(
                "duplicate key '{}' in collection '{collection}'",
                document.key
            )));
        }
        documents.push(document);
        Ok(())
    }

    async fn replace(&self, collection: &str, key: &str, body: String) -> Result<bool> {
        let mut collections = self.collections.write();
        let slot = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|document| document.key == key));
        match slot {
            Some(document) => {
                document.body = body;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<bool> {
        let mut collections = self.collections.write();
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = documents.len();
        documents.retain(|document| document.key != key);
        Ok(documents.len() != before)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
