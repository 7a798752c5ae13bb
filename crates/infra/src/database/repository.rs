//! Generic repository over a document collection

use std::sync::Arc;

use async_trait::async_trait;
use play_core::{Filter, Repository};
use play_domain::{Entity, PlayError, Result};
use tracing::{debug, instrument};

use super::document::DocumentCollection;

/// What `update` does when no stored entity has the given id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// Succeed without storing anything.
    #[default]
    Lenient,
    /// Fail with `NotFound`.
    Strict,
}

/// [`Repository`] implementation backed by a [`DocumentCollection`].
pub struct DocumentRepository<T: Entity> {
    collection: Arc<dyn DocumentCollection<T>>,
    update_mode: UpdateMode,
}

impl<T: Entity> DocumentRepository<T> {
    pub fn new(collection: Arc<dyn DocumentCollection<T>>) -> Self {
        Self { collection, update_mode: UpdateMode::default() }
    }

    pub fn with_update_mode(mut self, mode: UpdateMode) -> Self {
        self.update_mode = mode;
        self
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    fn ensure_present(&self, entity: &T, operation: &str) -> Result<()> {
        if entity.is_absent() {
            return Err(PlayError::Validation(format!(
                "cannot {operation} an absent entity in '{}'",
                self.collection.name()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for DocumentRepository<T> {
    #[instrument(skip_all, fields(collection = self.collection.name(), id = %entity.id()))]
    async fn create(&self, entity: T) -> Result<()> {
        self.ensure_present(&entity, "create")?;
        self.collection.insert_one(entity).await
    }

    async fn get_all(&self) -> Result<Vec<T>> {
        self.collection.find_all(&Filter::all()).await
    }

    async fn get_all_matching(&self, filter: &Filter<T>) -> Result<Vec<T>> {
        let matches = self.collection.find_all(filter).await?;
        debug!(
            collection = self.collection.name(),
            filter = filter.label(),
            count = matches.len(),
            "filtered query"
        );
        Ok(matches)
    }

    async fn get(&self, id: &T::Key) -> Result<Option<T>> {
        self.collection.find_by_id(id).await
    }

    async fn find(&self, filter: &Filter<T>) -> Result<Option<T>> {
        Ok(self.collection.find_all(filter).await?.into_iter().next())
    }

    #[instrument(skip_all, fields(collection = self.collection.name(), id = %entity.id()))]
    async fn update(&self, entity: T) -> Result<()> {
        self.ensure_present(&entity, "update")?;
        let id = entity.id().clone();
        let matched = self.collection.replace_one(&Filter::by_id(id.clone()), entity).await?;

        match (matched, self.update_mode) {
            (true, _) => Ok(()),
            (false, UpdateMode::Lenient) => {
                debug!("update matched no entity");
                Ok(())
            }
            (false, UpdateMode::Strict) => Err(PlayError::NotFound(format!(
                "no entity with id {id} in '{}'",
                self.collection.name()
            ))),
        }
    }

    #[instrument(skip_all, fields(collection = self.collection.name(), id = %id))]
    async fn remove(&self, id: &T::Key) -> Result<()> {
        let deleted = self.collection.delete_one(&Filter::by_id(id.clone())).await?;
        debug!(deleted, "remove");
        Ok(())
    }
}
