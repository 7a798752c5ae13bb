//! # Play Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces: the generic [`Repository`] with its [`Filter`]
//!   predicate, and the [`RemoteCollectionClient`] for peer services
//! - The catalog and inventory services built on those ports
//!
//! ## Architecture Principles
//! - Only depends on `play-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod catalog;
pub mod inventory;
pub mod remote;
pub mod repository;

pub use catalog::CatalogService;
pub use inventory::InventoryService;
pub use remote::ports::RemoteCollectionClient;
pub use repository::filter::Filter;
pub use repository::ports::Repository;
