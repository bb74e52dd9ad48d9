//! Kairos reporter library entry.
//!
//! This crate wires the metrics registry, the `put` transport, the reporter
//! and its scheduler into a cohesive reporting stack. It is intended to be
//! consumed by the binary (`main.rs`), by applications embedding the
//! registry, and by integration tests.

pub mod app;
pub mod config;
pub mod host;
pub mod registry;
pub mod reporter;
pub mod transport;
pub mod units;
