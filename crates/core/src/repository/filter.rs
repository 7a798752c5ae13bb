//! Predicates over entities.
//!
//! A [`Filter`] wraps a closure. Backends evaluate it against decoded
//! entities, so no storage query language leaks into the core.

use std::fmt;
use std::sync::Arc;

use play_domain::Entity;

type Predicate<T> = dyn Fn(&T) -> bool + Send + Sync;

/// Predicate selecting entities of type `T`.
pub struct Filter<T> {
    predicate: Arc<Predicate<T>>,
    label: &'static str,
}

impl<T> Clone for Filter<T> {
    fn clone(&self) -> Self {
        Self { predicate: Arc::clone(&self.predicate), label: self.label }
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter").field("label", &self.label).finish_non_exhaustive()
    }
}

impl<T> Filter<T> {
    /// Filter from an arbitrary predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::labelled("custom", predicate)
    }

    /// Filter with a short label used in logs.
    pub fn labelled<F>(label: &'static str, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self { predicate: Arc::new(predicate), label }
    }

    /// Filter matching every entity.
    pub fn all() -> Self {
        Self::labelled("all", |_| true)
    }

    pub fn matches(&self, entity: &T) -> bool {
        (self.predicate)(entity)
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Both filters must match.
    pub fn and(self, other: Filter<T>) -> Self
    where
        T: 'static,
    {
        Self::labelled("and", move |entity| self.matches(entity) && other.matches(entity))
    }
}

impl<T: Entity> Filter<T> {
    /// Filter matching the entity whose id equals `id`.
    pub fn by_id(id: T::Key) -> Self {
        Self::labelled("by_id", move |entity: &T| entity.id() == &id)
    }
}
