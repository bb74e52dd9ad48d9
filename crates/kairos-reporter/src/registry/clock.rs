//! Time sources for instruments and report timestamps.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A monotonic tick source plus wall-clock time.
pub trait Clock: Send + Sync {
    /// Monotonic time in nanoseconds from an arbitrary origin.
    fn tick(&self) -> u64;

    /// Wall-clock time in epoch milliseconds.
    fn time_millis(&self) -> i64;
}

/// Clock backed by `Instant` and `SystemTime`.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn tick(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn time_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Shared default clock.
pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock::new())
}

/// Hand-driven clock. Ticks and wall time only move on `advance`.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(time_millis: i64) -> Self {
        Self {
            nanos: AtomicU64::new(0),
            millis: AtomicI64::new(time_millis),
        }
    }

    /// Move both the tick and the wall clock forward.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let millis = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.nanos.fetch_add(nanos, Ordering::Relaxed);
        self.millis.fetch_add(millis, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn tick(&self) -> u64 {
        self.nanos.load(Ordering::Relaxed)
    }

    fn time_millis(&self) -> i64 {
        self.millis.load(Ordering::Relaxed)
    }
}
