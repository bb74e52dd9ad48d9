//! Top-level facade crate for the kairos reporter.
//!
//! Re-exports core types and the reporter library so users can depend on a single crate.

pub mod core {
    pub use kairos_core::*;
}

pub mod reporter {
    pub use kairos_reporter::*;
}
