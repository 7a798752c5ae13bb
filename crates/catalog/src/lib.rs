//! # Play Catalog
//!
//! HTTP service owning the catalog of purchasable items.
//!
//! This crate contains:
//! - The application context wiring store, repository and service
//! - The axum router and error rendering
//! - Fault injection for exercising callers' resilience
//!
//! ## Architecture
//! - Depends on `play-domain`, `play-core` and `play-infra`
//! - The binary in `main.rs` only loads configuration and serves the router

pub mod context;
pub mod errors;
pub mod faults;
pub mod routes;

pub use context::AppContext;
pub use errors::{ApiError, ApiResult};
pub use faults::FaultInjector;
pub use routes::router;
