//! Generic persistence port

pub mod filter;
pub mod ports;
