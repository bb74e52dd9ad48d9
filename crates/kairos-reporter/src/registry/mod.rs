//! In-process metrics registry.
//!
//! Provides the instruments the reporter publishes: counters, closure-backed
//! gauges, sliding-window histograms, EWMA meters and timers. Names live in a
//! `DashMap` so application threads can register and update instruments
//! while a report is being assembled.

pub mod clock;
mod ewma;
pub mod filter;
pub mod metrics;
pub mod snapshot;
mod store;

pub use clock::{system_clock, Clock, ManualClock, SystemClock};
pub use filter::{AllMetrics, MetricFilter, PatternColor, PatternFilter};
pub use metrics::{
    Counter, Gauge, GaugeValue, Histogram, Meter, Metered, Metric, Timer, TimerContext,
};
pub use snapshot::Snapshot;
pub use store::{MetricRegistry, RegistrySnapshot};
