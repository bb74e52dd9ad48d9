//! Reporter: registry snapshot -> `put` lines, once per tick.
//!
//! - `builder`: prefix, units, filter, clock and tags.
//! - `kairos`: one report pass (connect, emit, close).
//! - `scheduled`: periodic ticks on a tokio task.

mod builder;
mod kairos;
mod scheduled;

pub use builder::ReporterBuilder;
pub use kairos::Reporter;
pub use scheduled::ReporterHandle;
