//! Domain types and models
//!
//! Entities are what the repositories store; DTOs are what crosses HTTP.

pub mod catalog;
pub mod health;
pub mod inventory;

pub use catalog::{CreateItemDto, Item, ItemDto, UpdateItemDto};
pub use health::{ComponentHealth, HealthStatus};
pub use inventory::{CatalogItemDto, GrantItemsDto, InventoryItem, InventoryItemDto};
