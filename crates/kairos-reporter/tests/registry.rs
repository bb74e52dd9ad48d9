#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use kairos_core::{ErrorCode, Value};
use kairos_reporter::registry::{
    AllMetrics, GaugeValue, Histogram, ManualClock, Metered, Metric, MetricRegistry, Snapshot,
};

#[test]
fn get_or_create_returns_same_instrument() {
    let registry = MetricRegistry::new();
    let a = registry.counter("hits").unwrap();
    let b = registry.counter("hits").unwrap();
    a.inc();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(b.count(), 1);
}

#[test]
fn conflicting_type_is_rejected() {
    let registry = MetricRegistry::new();
    registry.counter("x").unwrap();
    let err = registry.timer("x").unwrap_err();
    assert_eq!(err.code(), ErrorCode::Registry);
    assert!(err.to_string().contains("counter"));

    let err = registry.gauge("x", || 1).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Registry);
}

#[test]
fn remove_and_names() {
    let registry = MetricRegistry::new();
    registry.meter("b").unwrap();
    registry.histogram("a").unwrap();
    registry.gauge("c", || 0).unwrap();
    assert_eq!(registry.names(), vec!["a", "b", "c"]);

    assert!(registry.remove("b"));
    assert!(!registry.remove("b"));
    assert_eq!(registry.len(), 2);
}

#[test]
fn snapshot_groups_and_sorts() {
    let registry = MetricRegistry::new();
    registry.counter("z").unwrap();
    registry.counter("a").unwrap();
    registry.timer("t").unwrap();
    registry.gauge("g", || "text").unwrap();

    let snap = registry.snapshot(&AllMetrics);
    let counters: Vec<&str> = snap.counters.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(counters, vec!["a", "z"]);
    assert_eq!(snap.timers.len(), 1);
    assert_eq!(snap.gauges.len(), 1);
    assert_eq!(snap.len(), 4);

    let only_timers = |_: &str, m: &Metric| matches!(m, Metric::Timer(_));
    let snap = registry.snapshot(&only_timers);
    assert_eq!(snap.len(), 1);
    assert!(snap.counters.is_empty());
}

#[test]
fn counter_goes_both_ways() {
    let registry = MetricRegistry::new();
    let c = registry.counter("c").unwrap();
    c.inc_by(5);
    c.dec();
    c.dec_by(10);
    assert_eq!(c.count(), -6);
}

#[test]
fn gauge_values() {
    assert_eq!(GaugeValue::from(3u64).as_number(), Some(Value::Int(3)));
    assert_eq!(GaugeValue::from(0.5).as_number(), Some(Value::Float(0.5)));
    assert_eq!(GaugeValue::from("up").as_number(), None);
}

#[test]
fn snapshot_statistics() {
    let s = Snapshot::new((1..=100).rev().collect());
    assert_eq!(s.min(), 1);
    assert_eq!(s.max(), 100);
    assert_eq!(s.size(), 100);
    assert!((s.mean() - 50.5).abs() < 1e-12);
    assert!((s.median() - 50.5).abs() < 1e-9);
    assert!((s.p75() - 75.75).abs() < 1e-9);
    assert!((s.p99() - 99.99).abs() < 1e-9);
    assert_eq!(s.p999(), 100.0);
    // sample stddev of 1..=100
    assert!((s.std_dev() - 29.011491975882016).abs() < 1e-9);
}

#[test]
fn empty_and_single_snapshots() {
    let empty = Snapshot::new(Vec::new());
    assert_eq!(empty.min(), 0);
    assert_eq!(empty.max(), 0);
    assert_eq!(empty.mean(), 0.0);
    assert_eq!(empty.std_dev(), 0.0);
    assert_eq!(empty.p99(), 0.0);

    let one = Snapshot::new(vec![7]);
    assert_eq!(one.median(), 7.0);
    assert_eq!(one.std_dev(), 0.0);
}

#[test]
fn histogram_window_keeps_latest_values() {
    let h = Histogram::with_window(3);
    for v in 1..=5 {
        h.update(v);
    }
    assert_eq!(h.count(), 5);
    assert_eq!(h.snapshot().values(), &[3, 4, 5]);
}

#[test]
fn meter_mean_rate() {
    let clock = Arc::new(ManualClock::new(0));
    let registry = MetricRegistry::with_clock(clock.clone());
    let meter = registry.meter("m").unwrap();

    assert_eq!(meter.mean_rate(), 0.0);
    meter.mark_n(30);
    clock.advance(Duration::from_secs(10));
    assert_eq!(meter.count(), 30);
    assert!((meter.mean_rate() - 3.0).abs() < 1e-12);
}

#[test]
fn meter_catches_up_on_missed_ticks() {
    let clock = Arc::new(ManualClock::new(0));
    let registry = MetricRegistry::with_clock(clock.clone());
    let meter = registry.meter("m").unwrap();

    meter.mark_n(5);
    clock.advance(Duration::from_secs(5));
    let first = meter.one_minute_rate();
    assert!((first - 1.0).abs() < 1e-12);

    clock.advance(Duration::from_secs(60));
    let later = meter.one_minute_rate();
    assert!(later < first);
    assert!(meter.fifteen_minute_rate() > later);
}

#[test]
fn timer_context_records_elapsed_time() {
    let clock = Arc::new(ManualClock::new(0));
    let registry = MetricRegistry::with_clock(clock.clone());
    let timer = registry.timer("t").unwrap();

    let ctx = timer.start();
    clock.advance(Duration::from_millis(250));
    assert_eq!(ctx.stop(), Duration::from_millis(250));

    {
        let _guard = timer.start();
        clock.advance(Duration::from_millis(50));
    }

    let out = timer.time(|| {
        clock.advance(Duration::from_millis(100));
        "done"
    });
    assert_eq!(out, "done");

    assert_eq!(timer.count(), 3);
    let s = timer.snapshot();
    assert_eq!(s.values(), &[50_000_000, 100_000_000, 250_000_000]);
}
