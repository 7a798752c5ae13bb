//! Catalog item management

pub mod service;

pub use service::CatalogService;
