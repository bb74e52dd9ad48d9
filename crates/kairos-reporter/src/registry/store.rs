use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use kairos_core::error::{KairosError, Result};

use crate::registry::clock::{system_clock, Clock};
use crate::registry::filter::MetricFilter;
use crate::registry::metrics::{Counter, Gauge, GaugeValue, Histogram, Meter, Metric, Timer};

/// Named instruments, shared between the application and the reporter.
pub struct MetricRegistry {
    metrics: DashMap<String, Metric>,
    clock: Arc<dyn Clock>,
}

/// Filtered registry contents, each list sorted by name.
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    pub gauges: Vec<(String, Arc<Gauge>)>,
    pub counters: Vec<(String, Arc<Counter>)>,
    pub histograms: Vec<(String, Arc<Histogram>)>,
    pub meters: Vec<(String, Arc<Meter>)>,
    pub timers: Vec<(String, Arc<Timer>)>,
}

impl RegistrySnapshot {
    pub fn len(&self) -> usize {
        self.gauges.len()
            + self.counters.len()
            + self.histograms.len()
            + self.meters.len()
            + self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::with_clock(system_clock())
    }

    /// Meters and timers created by this registry tick on `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            metrics: DashMap::new(),
            clock,
        }
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub fn counter(&self, name: &str) -> Result<Arc<Counter>> {
        self.get_or_add(
            name,
            || Metric::Counter(Arc::new(Counter::new())),
            |m| match m {
                Metric::Counter(c) => Some(Arc::clone(c)),
                _ => None,
            },
        )
    }

    pub fn histogram(&self, name: &str) -> Result<Arc<Histogram>> {
        self.get_or_add(
            name,
            || Metric::Histogram(Arc::new(Histogram::new())),
            |m| match m {
                Metric::Histogram(h) => Some(Arc::clone(h)),
                _ => None,
            },
        )
    }

    pub fn meter(&self, name: &str) -> Result<Arc<Meter>> {
        let clock = self.clock();
        self.get_or_add(
            name,
            move || Metric::Meter(Arc::new(Meter::new(clock))),
            |m| match m {
                Metric::Meter(x) => Some(Arc::clone(x)),
                _ => None,
            },
        )
    }

    pub fn timer(&self, name: &str) -> Result<Arc<Timer>> {
        let clock = self.clock();
        self.get_or_add(
            name,
            move || Metric::Timer(Arc::new(Timer::new(clock))),
            |m| match m {
                Metric::Timer(t) => Some(Arc::clone(t)),
                _ => None,
            },
        )
    }

    /// Register a gauge; fails if the name is already taken.
    pub fn register_gauge(&self, name: &str, gauge: Gauge) -> Result<Arc<Gauge>> {
        match self.metrics.entry(name.to_string()) {
            Entry::Occupied(e) => Err(KairosError::Registry(format!(
                "a {} named {name} already exists",
                e.get().kind()
            ))),
            Entry::Vacant(e) => {
                let gauge = Arc::new(gauge);
                e.insert(Metric::Gauge(Arc::clone(&gauge)));
                Ok(gauge)
            }
        }
    }

    /// Shorthand for `register_gauge(name, Gauge::new(read))`.
    pub fn gauge<F, V>(&self, name: &str, read: F) -> Result<Arc<Gauge>>
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<GaugeValue>,
    {
        self.register_gauge(name, Gauge::new(read))
    }

    pub fn remove(&self, name: &str) -> bool {
        self.metrics.remove(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.metrics.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Copy out every metric accepted by `filter`, grouped by type.
    pub fn snapshot(&self, filter: &dyn MetricFilter) -> RegistrySnapshot {
        // Clone out first so the filter never runs under a shard lock.
        let mut all: Vec<(String, Metric)> = self
            .metrics
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));

        let mut out = RegistrySnapshot::default();
        for (name, metric) in all {
            if !filter.matches(&name, &metric) {
                continue;
            }
            match metric {
                Metric::Gauge(g) => out.gauges.push((name, g)),
                Metric::Counter(c) => out.counters.push((name, c)),
                Metric::Histogram(h) => out.histograms.push((name, h)),
                Metric::Meter(m) => out.meters.push((name, m)),
                Metric::Timer(t) => out.timers.push((name, t)),
            }
        }
        out
    }

    fn get_or_add<T>(
        &self,
        name: &str,
        make: impl FnOnce() -> Metric,
        pick: impl Fn(&Metric) -> Option<Arc<T>>,
    ) -> Result<Arc<T>> {
        let entry = self.metrics.entry(name.to_string()).or_insert_with(make);
        pick(entry.value()).ok_or_else(|| {
            KairosError::Registry(format!(
                "a {} named {name} already exists",
                entry.value().kind()
            ))
        })
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}
