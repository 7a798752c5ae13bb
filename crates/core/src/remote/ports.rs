//! Port interface for peer-service collections

use async_trait::async_trait;
use play_domain::Result;

/// Fetches a named collection from a peer service.
///
/// Implementations own retries and circuit breaking; callers see either the
/// data or a terminal `RemoteCallFailed` / `CircuitOpen` error.
#[async_trait]
pub trait RemoteCollectionClient<T: Send + 'static>: Send + Sync {
    async fn fetch_collection(&self, route: &str) -> Result<Vec<T>>;
}
