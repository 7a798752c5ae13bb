//! # Play Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - Document store backends (in-memory, SQLite) and the generic repository
//! - The HTTP collection transport and the resilient remote client
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `play-core`
//! - Depends on `play-domain`, `play-core` and `play-common`
//! - Contains all "impure" code (I/O, network, files)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;

pub use database::*;
pub use errors::InfraError;
pub use http::*;
