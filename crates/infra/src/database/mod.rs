//! Document persistence
//!
//! - `document`: backend and collection ports plus the JSON collection
//! - `memory` / `sqlite`: the two bundled backends
//! - `manager`: SQLite connection pool
//! - `repository`: generic `Repository` implementation
//! - `store`: backend selection from settings

pub mod document;
pub mod manager;
pub mod memory;
pub mod repository;
pub mod sqlite;
pub mod store;

pub use document::{DocumentBackend, DocumentCollection, JsonCollection, StoredDocument};
pub use manager::DbManager;
pub use memory::MemoryBackend;
pub use repository::{DocumentRepository, UpdateMode};
pub use sqlite::SqliteBackend;
pub use store::Store;
