//! Exponentially-weighted moving average rates.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Interval between decay ticks.
pub(crate) const TICK_INTERVAL_NANOS: u64 = 5_000_000_000;
const TICK_INTERVAL_SECS: f64 = 5.0;

/// Event rate decayed over a window of `minutes`, ticked every 5 seconds.
pub(crate) struct Ewma {
    alpha: f64,
    uncounted: AtomicU64,
    rate: Mutex<Option<f64>>,
}

impl Ewma {
    fn new(minutes: f64) -> Self {
        Self {
            alpha: 1.0 - (-TICK_INTERVAL_SECS / 60.0 / minutes).exp(),
            uncounted: AtomicU64::new(0),
            rate: Mutex::new(None),
        }
    }

    pub(crate) fn one_minute() -> Self {
        Self::new(1.0)
    }

    pub(crate) fn five_minutes() -> Self {
        Self::new(5.0)
    }

    pub(crate) fn fifteen_minutes() -> Self {
        Self::new(15.0)
    }

    pub(crate) fn update(&self, n: u64) {
        self.uncounted.fetch_add(n, Ordering::Relaxed);
    }

    /// Fold the events seen since the last tick into the rate.
    pub(crate) fn tick(&self) {
        let count = self.uncounted.swap(0, Ordering::Relaxed);
        let instant_rate = count as f64 / TICK_INTERVAL_SECS;
        let mut rate = self.rate.lock();
        *rate = Some(match *rate {
            Some(r) => r + self.alpha * (instant_rate - r),
            None => instant_rate,
        });
    }

    /// Events per second; zero until the first tick.
    pub(crate) fn rate_per_sec(&self) -> f64 {
        self.rate.lock().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_takes_instant_rate() {
        let ewma = Ewma::one_minute();
        ewma.update(3);
        ewma.tick();
        assert!((ewma.rate_per_sec() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn idle_ticks_decay_towards_zero() {
        let ewma = Ewma::one_minute();
        ewma.update(3);
        ewma.tick();
        for _ in 0..12 {
            ewma.tick();
        }
        // one minute of silence on a one-minute window leaves ~e^-1
        let expected = 0.6 * (-1.0f64).exp();
        assert!((ewma.rate_per_sec() - expected).abs() < 1e-9);
    }

    #[test]
    fn longer_windows_decay_slower() {
        let m1 = Ewma::one_minute();
        let m15 = Ewma::fifteen_minutes();
        for e in [&m1, &m15] {
            e.update(10);
            e.tick();
            e.tick();
        }
        assert!(m15.rate_per_sec() > m1.rate_per_sec());
    }
}
