#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use play_infra::database::{DbManager, DocumentBackend, MemoryBackend, SqliteBackend, Store};
use play_infra::http::{CollectionTransport, TransportError};
use tempfile::TempDir;

/// A store on one of the backends, keeping any temp directory alive for the
/// duration of a test. `backend` is the raw document backend behind `store`.
pub struct TestStore {
    pub store: Store,
    pub backend: Arc<dyn DocumentBackend>,
    _temp_dir: Option<TempDir>,
}

impl TestStore {
    pub fn memory() -> Self {
        Self::over(Arc::new(MemoryBackend::new()), None)
    }

    pub fn sqlite() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db = DbManager::new(temp_dir.path().join("contract.db"), 2)
            .expect("sqlite database should open");
        Self::over(Arc::new(SqliteBackend::new(Arc::new(db))), Some(temp_dir))
    }

    fn over(backend: Arc<dyn DocumentBackend>, temp_dir: Option<TempDir>) -> Self {
        Self { store: Store::from_backend(Arc::clone(&backend)), backend, _temp_dir: temp_dir }
    }

    /// One store per backend, labelled for assertion messages.
    pub fn all() -> Vec<(&'static str, TestStore)> {
        vec![("memory", Self::memory()), ("sqlite", Self::sqlite())]
    }
}

/// Transport that replays a script of responses and counts calls.
///
/// Clones share the script, so a test can keep one handle for assertions
/// while the client owns another. Once the script runs out the last entry
/// repeats.
pub struct ScriptedTransport<T> {
    inner: Arc<Script<T>>,
}

struct Script<T> {
    steps: Mutex<VecDeque<Step<T>>>,
    calls: Mutex<Vec<tokio::time::Instant>>,
}

#[derive(Clone)]
pub enum Step<T> {
    Respond(Result<Vec<T>, TransportError>),
    /// Sleep before answering, to trip the per-attempt timeout.
    Stall(Duration),
}

impl<T> Clone for ScriptedTransport<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Clone> ScriptedTransport<T> {
    pub fn new(script: Vec<Step<T>>) -> Self {
        Self {
            inner: Arc::new(Script {
                steps: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn always(result: Result<Vec<T>, TransportError>) -> Self {
        Self::new(vec![Step::Respond(result)])
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.lock().len()
    }

    /// Gaps between consecutive calls, as seen by the tokio clock.
    pub fn gaps(&self) -> Vec<Duration> {
        self.inner.calls.lock().windows(2).map(|pair| pair[1] - pair[0]).collect()
    }

    fn next_step(&self) -> Option<Step<T>> {
        let mut steps = self.inner.steps.lock();
        if steps.len() > 1 {
            steps.pop_front()
        } else {
            steps.front().cloned()
        }
    }
}

#[async_trait]
impl<T> CollectionTransport<T> for ScriptedTransport<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get_collection(&self, _route: &str) -> Result<Vec<T>, TransportError> {
        self.inner.calls.lock().push(tokio::time::Instant::now());
        match self.next_step() {
            Some(Step::Respond(result)) => result,
            Some(Step::Stall(duration)) => {
                tokio::time::sleep(duration).await;
                Ok(Vec::new())
            }
            None => Err(TransportError::Connect("empty script".into())),
        }
    }
}

pub fn unavailable() -> TransportError {
    TransportError::Status { status: 503, url: "http://catalog/items".into() }
}
