//! # Play Inventory
//!
//! HTTP service tracking which catalog items each user owns.
//!
//! Listings call the catalog service through the resilient client, so a
//! slow or failing catalog surfaces as `502` (retries exhausted) or `503`
//! (circuit open) instead of hanging requests.

pub mod context;
pub mod errors;
pub mod routes;

pub use context::{AppContext, CatalogClient};
pub use errors::{ApiError, ApiResult};
pub use routes::router;
