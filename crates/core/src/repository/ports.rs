//! Port interface for entity persistence
//!
//! One repository serves one collection of one entity type. Implementations
//! live in `play-infra`; tests use in-memory recording doubles.

use async_trait::async_trait;
use play_domain::{Entity, Result};

use super::filter::Filter;

/// CRUD plus predicate queries over a collection of `T`.
///
/// Every operation is atomic for the single entity it touches. Lookups that
/// find nothing return `None` rather than an error.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Insert a new entity.
    ///
    /// Fails with `Validation` when the entity is absent and with
    /// `Persistence` when its id already exists.
    async fn create(&self, entity: T) -> Result<()>;

    /// Every entity in the collection.
    async fn get_all(&self) -> Result<Vec<T>>;

    /// Entities matching `filter`, in no guaranteed order.
    async fn get_all_matching(&self, filter: &Filter<T>) -> Result<Vec<T>>;

    /// Entity with the given id.
    async fn get(&self, id: &T::Key) -> Result<Option<T>>;

    /// First entity matching `filter`.
    async fn find(&self, filter: &Filter<T>) -> Result<Option<T>>;

    /// Replace the stored entity that has the same id.
    ///
    /// Fails with `Validation` when the entity is absent. Whether a missing
    /// id is an error depends on the implementation's update mode.
    async fn update(&self, entity: T) -> Result<()>;

    /// Delete by id. Removing a missing id succeeds.
    async fn remove(&self, id: &T::Key) -> Result<()>;
}
