//! Instrument types held by the registry.
//!
//! Counters and meters are lock-free atomics. Histogram reservoirs and
//! meter decay state sit behind `parking_lot` mutexes; both are held only
//! for a push or a copy.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use kairos_core::Value;

use crate::registry::clock::Clock;
use crate::registry::ewma::{Ewma, TICK_INTERVAL_NANOS};
use crate::registry::snapshot::Snapshot;

/// Number of most recent values kept by a histogram reservoir.
pub const DEFAULT_WINDOW: usize = 1028;

/// Signed running count.
#[derive(Debug, Default)]
pub struct Counter {
    count: AtomicI64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.inc_by(1);
    }

    pub fn inc_by(&self, n: i64) {
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        self.dec_by(1);
    }

    pub fn dec_by(&self, n: i64) {
        self.count.fetch_sub(n, Ordering::Relaxed);
    }

    pub fn count(&self) -> i64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// What a gauge reads at report time. Only numbers are reported.
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeValue {
    Number(Value),
    Text(String),
}

impl GaugeValue {
    pub fn as_number(&self) -> Option<Value> {
        match self {
            GaugeValue::Number(v) => Some(*v),
            GaugeValue::Text(_) => None,
        }
    }
}

impl From<Value> for GaugeValue {
    fn from(v: Value) -> Self {
        GaugeValue::Number(v)
    }
}

macro_rules! numeric_gauge_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for GaugeValue {
                fn from(v: $t) -> Self {
                    GaugeValue::Number(Value::from(v))
                }
            }
        )*
    };
}

numeric_gauge_value!(i32, i64, u32, u64, usize, f32, f64);

impl From<String> for GaugeValue {
    fn from(v: String) -> Self {
        GaugeValue::Text(v)
    }
}

impl From<&str> for GaugeValue {
    fn from(v: &str) -> Self {
        GaugeValue::Text(v.to_string())
    }
}

/// Instantaneous reading computed by a closure.
pub struct Gauge {
    read: Box<dyn Fn() -> GaugeValue + Send + Sync>,
}

impl Gauge {
    pub fn new<F, V>(read: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<GaugeValue>,
    {
        Self {
            read: Box::new(move || -> GaugeValue { read().into() }),
        }
    }

    pub fn value(&self) -> GaugeValue {
        (self.read)()
    }
}

impl fmt::Debug for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gauge").finish_non_exhaustive()
    }
}

/// Distribution of `i64` values over a sliding window.
#[derive(Debug)]
pub struct Histogram {
    count: AtomicU64,
    window: Mutex<VecDeque<i64>>,
    capacity: usize,
}

impl Histogram {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    pub fn with_window(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            count: AtomicU64::new(0),
            window: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn update(&self, value: i64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        let mut window = self.window.lock();
        if window.len() == self.capacity {
            window.pop_front();
        }
        window.push_back(value);
    }

    /// Total number of updates, including values evicted from the window.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> Snapshot {
        let values: Vec<i64> = self.window.lock().iter().copied().collect();
        Snapshot::new(values)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Anything that counts events and exposes their rates (per second).
pub trait Metered {
    fn count(&self) -> u64;
    fn one_minute_rate(&self) -> f64;
    fn five_minute_rate(&self) -> f64;
    fn fifteen_minute_rate(&self) -> f64;
    fn mean_rate(&self) -> f64;
}

/// Event rate tracker: count, decaying 1/5/15 minute rates, mean rate.
pub struct Meter {
    clock: Arc<dyn Clock>,
    start: u64,
    last_tick: AtomicU64,
    count: AtomicU64,
    m1: Ewma,
    m5: Ewma,
    m15: Ewma,
}

impl Meter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let start = clock.tick();
        Self {
            clock,
            start,
            last_tick: AtomicU64::new(start),
            count: AtomicU64::new(0),
            m1: Ewma::one_minute(),
            m5: Ewma::five_minutes(),
            m15: Ewma::fifteen_minutes(),
        }
    }

    pub fn mark(&self) {
        self.mark_n(1);
    }

    pub fn mark_n(&self, n: u64) {
        self.tick_if_necessary();
        self.count.fetch_add(n, Ordering::Relaxed);
        self.m1.update(n);
        self.m5.update(n);
        self.m15.update(n);
    }

    /// Catch up on every whole tick interval elapsed since the last one.
    fn tick_if_necessary(&self) {
        let old = self.last_tick.load(Ordering::Relaxed);
        let now = self.clock.tick();
        let age = now.saturating_sub(old);
        if age < TICK_INTERVAL_NANOS {
            return;
        }

        let interval_start = now - age % TICK_INTERVAL_NANOS;
        if self
            .last_tick
            .compare_exchange(old, interval_start, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            for _ in 0..age / TICK_INTERVAL_NANOS {
                self.m1.tick();
                self.m5.tick();
                self.m15.tick();
            }
        }
    }
}

impl Metered for Meter {
    fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    fn one_minute_rate(&self) -> f64 {
        self.tick_if_necessary();
        self.m1.rate_per_sec()
    }

    fn five_minute_rate(&self) -> f64 {
        self.tick_if_necessary();
        self.m5.rate_per_sec()
    }

    fn fifteen_minute_rate(&self) -> f64 {
        self.tick_if_necessary();
        self.m15.rate_per_sec()
    }

    fn mean_rate(&self) -> f64 {
        let count = self.count();
        let elapsed = self.clock.tick().saturating_sub(self.start);
        if count == 0 || elapsed == 0 {
            return 0.0;
        }
        count as f64 / (elapsed as f64 / 1e9)
    }
}

impl fmt::Debug for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Meter")
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}

/// Histogram of durations (nanoseconds) plus a meter of their rate.
pub struct Timer {
    clock: Arc<dyn Clock>,
    histogram: Histogram,
    meter: Meter,
}

impl Timer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            meter: Meter::new(Arc::clone(&clock)),
            histogram: Histogram::new(),
            clock,
        }
    }

    pub fn update(&self, duration: Duration) {
        let nanos = i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX);
        self.histogram.update(nanos);
        self.meter.mark();
    }

    /// Run `f` and record how long it took.
    pub fn time<T>(&self, f: impl FnOnce() -> T) -> T {
        let ctx = self.start();
        let out = f();
        ctx.stop();
        out
    }

    /// Start timing; the elapsed time is recorded on `stop` or drop.
    pub fn start(&self) -> TimerContext<'_> {
        TimerContext {
            timer: self,
            started: self.clock.tick(),
            stopped: false,
        }
    }

    /// Snapshot of recorded durations, in nanoseconds.
    pub fn snapshot(&self) -> Snapshot {
        self.histogram.snapshot()
    }
}

impl Metered for Timer {
    fn count(&self) -> u64 {
        self.meter.count()
    }

    fn one_minute_rate(&self) -> f64 {
        self.meter.one_minute_rate()
    }

    fn five_minute_rate(&self) -> f64 {
        self.meter.five_minute_rate()
    }

    fn fifteen_minute_rate(&self) -> f64 {
        self.meter.fifteen_minute_rate()
    }

    fn mean_rate(&self) -> f64 {
        self.meter.mean_rate()
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}

/// Running measurement started by [`Timer::start`].
pub struct TimerContext<'a> {
    timer: &'a Timer,
    started: u64,
    stopped: bool,
}

impl TimerContext<'_> {
    /// Record and return the elapsed time.
    pub fn stop(mut self) -> Duration {
        self.record()
    }

    fn record(&mut self) -> Duration {
        self.stopped = true;
        let elapsed = Duration::from_nanos(self.timer.clock.tick().saturating_sub(self.started));
        self.timer.update(elapsed);
        elapsed
    }
}

impl Drop for TimerContext<'_> {
    fn drop(&mut self) {
        if !self.stopped {
            self.record();
        }
    }
}

/// A registered instrument.
#[derive(Debug, Clone)]
pub enum Metric {
    Counter(Arc<Counter>),
    Gauge(Arc<Gauge>),
    Histogram(Arc<Histogram>),
    Meter(Arc<Meter>),
    Timer(Arc<Timer>),
}

impl Metric {
    pub fn kind(&self) -> &'static str {
        match self {
            Metric::Counter(_) => "counter",
            Metric::Gauge(_) => "gauge",
            Metric::Histogram(_) => "histogram",
            Metric::Meter(_) => "meter",
            Metric::Timer(_) => "timer",
        }
    }
}
