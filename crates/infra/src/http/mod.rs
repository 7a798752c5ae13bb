//! HTTP access to peer services.

pub mod client;
pub mod resilient;

pub use client::{CollectionTransport, HttpTransport, HttpTransportBuilder, TransportError};
pub use resilient::ResilientClient;
