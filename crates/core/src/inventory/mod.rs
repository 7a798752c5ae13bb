//! Per-user inventories joined with catalog data

pub mod service;

pub use service::InventoryService;
