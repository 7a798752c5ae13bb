//! Access to collections served by peer services

pub mod ports;
