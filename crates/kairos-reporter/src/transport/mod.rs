//! Transport layer.
//!
//! - `client`: the `KairosClient` seam the reporter writes through.
//! - `tcp`: telnet `put` client over a plain TCP socket.

pub mod client;
pub mod tcp;

pub use client::KairosClient;
pub use tcp::KairosDb;
