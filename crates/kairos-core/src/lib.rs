//! Kairos core: transport-agnostic protocol primitives and error types.
//!
//! This crate defines the telnet `put` line format, metric naming, tag
//! validation and the error surface shared by the reporter and its tooling.
//! It carries no runtime or socket dependencies so it can be reused by any
//! writer that speaks the KairosDB / OpenTSDB line protocol.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `KairosError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod value;

/// Shared result type.
pub use error::{ErrorCode, KairosError, Result};
pub use protocol::tag::TagSet;
pub use value::{Sample, Value};
