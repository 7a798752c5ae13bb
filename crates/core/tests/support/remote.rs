//! Scripted remote client

use async_trait::async_trait;
use parking_lot::Mutex;
use play_core::RemoteCollectionClient;
use play_domain::{PlayError, Result as DomainResult};

/// `RemoteCollectionClient` answering from a fixed collection or a fixed
/// error, recording the requested routes.
pub struct StubRemoteClient<T> {
    response: DomainResult<Vec<T>>,
    routes: Mutex<Vec<String>>,
}

impl<T: Clone + Send + Sync + 'static> StubRemoteClient<T> {
    pub fn returning(items: Vec<T>) -> Self {
        Self { response: Ok(items), routes: Mutex::new(Vec::new()) }
    }

    pub fn failing(error: PlayError) -> Self {
        Self { response: Err(error), routes: Mutex::new(Vec::new()) }
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().clone()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> RemoteCollectionClient<T> for StubRemoteClient<T> {
    async fn fetch_collection(&self, route: &str) -> DomainResult<Vec<T>> {
        self.routes.lock().push(route.to_string());
        self.response.clone()
    }
}
