//! Shared test helpers for `play-core` integration tests.
//!
//! Recording doubles for the repository and remote-client ports so service
//! tests can assert on exactly which port calls were made.

#![allow(dead_code)]

pub mod remote;
pub mod repositories;
