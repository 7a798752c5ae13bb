//! Recording repository for service tests
//!
//! Keeps entities in insertion order and logs every call, so tests can assert
//! "exactly one update, zero creates" style properties.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use play_core::{Filter, Repository};
use play_domain::{Entity, PlayError, Result as DomainResult};

/// A port call seen by [`RecordingRepository`].
#[derive(Debug, Clone, PartialEq)]
pub enum RepoCall<T> {
    Create(T),
    GetAll,
    GetAllMatching,
    Get(String),
    Find,
    Update(T),
    Remove(String),
}

/// In-memory `Repository` that records its calls.
pub struct RecordingRepository<T> {
    entities: Mutex<Vec<T>>,
    calls: Mutex<Vec<RepoCall<T>>>,
}

impl<T: Entity> RecordingRepository<T> {
    pub fn new() -> Arc<Self> {
        Self::seeded(Vec::new())
    }

    /// Repository pre-populated with `entities`. Seeding is not recorded.
    pub fn seeded(entities: Vec<T>) -> Arc<Self> {
        Arc::new(Self { entities: Mutex::new(entities), calls: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> Vec<RepoCall<T>> {
        self.calls.lock().clone()
    }

    pub fn created(&self) -> Vec<T> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RepoCall::Create(entity) => Some(entity.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn updated(&self) -> Vec<T> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RepoCall::Update(entity) => Some(entity.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn stored(&self) -> Vec<T> {
        self.entities.lock().clone()
    }

    fn record(&self, call: RepoCall<T>) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for RecordingRepository<T> {
    async fn create(&self, entity: T) -> DomainResult<()> {
        self.record(RepoCall::Create(entity.clone()));
        if entity.is_absent() {
            return Err(PlayError::Validation("entity is absent".into()));
        }
        let mut entities = self.entities.lock();
        if entities.iter().any(|existing| existing.id() == entity.id()) {
            return Err(PlayError::Persistence(format!("duplicate key {}", entity.id())));
        }
        entities.push(entity);
        Ok(())
    }

    async fn get_all(&self) -> DomainResult<Vec<T>> {
        self.record(RepoCall::GetAll);
        Ok(self.stored())
    }

    async fn get_all_matching(&self, filter: &Filter<T>) -> DomainResult<Vec<T>> {
        self.record(RepoCall::GetAllMatching);
        Ok(self.entities.lock().iter().filter(|e| filter.matches(e)).cloned().collect())
    }

    async fn get(&self, id: &T::Key) -> DomainResult<Option<T>> {
        self.record(RepoCall::Get(id.to_string()));
        Ok(self.entities.lock().iter().find(|e| e.id() == id).cloned())
    }

    async fn find(&self, filter: &Filter<T>) -> DomainResult<Option<T>> {
        self.record(RepoCall::Find);
        Ok(self.entities.lock().iter().find(|e| filter.matches(e)).cloned())
    }

    async fn update(&self, entity: T) -> DomainResult<()> {
        self.record(RepoCall::Update(entity.clone()));
        if entity.is_absent() {
            return Err(PlayError::Validation("entity is absent".into()));
        }
        let mut entities = self.entities.lock();
        if let Some(slot) = entities.iter_mut().find(|e| e.id() == entity.id()) {
            *slot = entity;
        }
        Ok(())
    }

    async fn remove(&self, id: &T::Key) -> DomainResult<()> {
        self.record(RepoCall::Remove(id.to_string()));
        self.entities.lock().retain(|e| e.id() != id);
        Ok(())
    }
}
