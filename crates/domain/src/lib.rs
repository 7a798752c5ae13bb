//! # Play Domain
//!
//! Business domain types for the Play Economy services.
//!
//! This crate contains:
//! - The shared error type and `Result` alias
//! - Configuration structures and their defaults
//! - The `Entity` / `EntityKey` contract used by the generic repository
//! - Catalog and inventory entities plus their wire DTOs
//!
//! ## Architecture
//! - No dependencies on other Play crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod entity;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use entity::{Entity, EntityKey};
pub use errors::*;
pub use types::*;
