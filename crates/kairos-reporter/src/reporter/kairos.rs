use std::sync::Arc;

use kairos_core::error::Result;
use kairos_core::protocol::name::metric_name;
use kairos_core::Value;

use crate::registry::{
    Clock, Counter, Gauge, Histogram, Metered, MetricFilter, MetricRegistry, RegistrySnapshot,
    Snapshot, Timer,
};
use crate::reporter::builder::ReporterBuilder;
use crate::transport::KairosClient;
use crate::units::TimeUnit;

/// Publishes a registry to a KairosDB server through a [`KairosClient`].
pub struct Reporter<C> {
    pub(crate) registry: Arc<MetricRegistry>,
    pub(crate) client: C,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) prefix: Option<String>,
    pub(crate) rate_unit: TimeUnit,
    pub(crate) duration_unit: TimeUnit,
    pub(crate) filter: Arc<dyn MetricFilter>,
}

impl Reporter<()> {
    /// Start building a reporter for `registry`.
    pub fn for_registry(registry: Arc<MetricRegistry>) -> ReporterBuilder {
        ReporterBuilder::new(registry)
    }
}

impl<C: KairosClient> Reporter<C> {
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_client(self) -> C {
        self.client
    }

    /// One report pass: connect, send every filtered metric, close.
    ///
    /// A failed connect or send is logged and ends the pass; the
    /// connection is closed either way.
    pub async fn report(&mut self) {
        let timestamp = self.clock.time_millis();
        let snapshot = self.registry.snapshot(self.filter.as_ref());

        if let Err(e) = self.send_all(&snapshot, timestamp).await {
            tracing::warn!(
                server = %self.client.endpoint(),
                code = e.code().as_str(),
                error = %e,
                "unable to report to server"
            );
        }

        if let Err(e) = self.client.close().await {
            tracing::debug!(server = %self.client.endpoint(), error = %e, "error disconnecting from server");
        }
    }

    async fn send_all(&mut self, snapshot: &RegistrySnapshot, timestamp: i64) -> Result<()> {
        self.client.connect().await?;

        for (name, gauge) in &snapshot.gauges {
            self.report_gauge(name, gauge, timestamp).await?;
        }
        for (name, counter) in &snapshot.counters {
            self.report_counter(name, counter, timestamp).await?;
        }
        for (name, histogram) in &snapshot.histograms {
            self.report_histogram(name, histogram, timestamp).await?;
        }
        for (name, meter) in &snapshot.meters {
            self.report_metered(name, meter.as_ref(), timestamp).await?;
        }
        for (name, timer) in &snapshot.timers {
            self.report_timer(name, timer, timestamp).await?;
        }

        tracing::trace!(metrics = snapshot.len(), timestamp, "report sent");
        Ok(())
    }

    async fn report_gauge(&mut self, name: &str, gauge: &Gauge, timestamp: i64) -> Result<()> {
        match gauge.value().as_number() {
            Some(v) => self.emit(name, "", v, timestamp).await,
            None => Ok(()),
        }
    }

    async fn report_counter(&mut self, name: &str, counter: &Counter, timestamp: i64) -> Result<()> {
        self.emit(name, "count", Value::Int(counter.count()), timestamp)
            .await
    }

    async fn report_histogram(
        &mut self,
        name: &str,
        histogram: &Histogram,
        timestamp: i64,
    ) -> Result<()> {
        let s = histogram.snapshot();
        self.emit(name, "count", Value::from(histogram.count()), timestamp)
            .await?;
        self.emit(name, "max", Value::Int(s.max()), timestamp).await?;
        self.emit(name, "mean", Value::Float(s.mean()), timestamp).await?;
        self.emit(name, "min", Value::Int(s.min()), timestamp).await?;
        self.emit(name, "stddev", Value::Float(s.std_dev()), timestamp)
            .await?;
        self.report_quantiles(name, &s, |v| v, timestamp).await
    }

    async fn report_timer(&mut self, name: &str, timer: &Timer, timestamp: i64) -> Result<()> {
        let s = timer.snapshot();
        let unit = self.duration_unit;
        let convert = move |nanos: f64| nanos / unit.nanos() as f64;

        self.emit(name, "max", Value::Float(convert(s.max() as f64)), timestamp)
            .await?;
        self.emit(name, "mean", Value::Float(convert(s.mean())), timestamp)
            .await?;
        self.emit(name, "min", Value::Float(convert(s.min() as f64)), timestamp)
            .await?;
        self.emit(name, "stddev", Value::Float(convert(s.std_dev())), timestamp)
            .await?;
        self.report_quantiles(name, &s, convert, timestamp).await?;

        self.report_metered(name, timer, timestamp).await
    }

    async fn report_quantiles(
        &mut self,
        name: &str,
        s: &Snapshot,
        convert: impl Fn(f64) -> f64 + Send,
        timestamp: i64,
    ) -> Result<()> {
        let quantiles = [
            ("p50", s.median()),
            ("p75", s.p75()),
            ("p95", s.p95()),
            ("p98", s.p98()),
            ("p99", s.p99()),
            ("p999", s.p999()),
        ];
        for (suffix, v) in quantiles {
            self.emit(name, suffix, Value::Float(convert(v)), timestamp)
                .await?;
        }
        Ok(())
    }

    async fn report_metered(
        &mut self,
        name: &str,
        metered: &(dyn Metered + Sync),
        timestamp: i64,
    ) -> Result<()> {
        let per_unit = self.rate_unit.seconds();
        let rates = [
            ("m1_rate", metered.one_minute_rate()),
            ("m5_rate", metered.five_minute_rate()),
            ("m15_rate", metered.fifteen_minute_rate()),
            ("mean_rate", metered.mean_rate()),
        ];

        self.emit(name, "count", Value::from(metered.count()), timestamp)
            .await?;
        for (suffix, rate) in rates {
            self.emit(name, suffix, Value::Float(rate * per_unit), timestamp)
                .await?;
        }
        Ok(())
    }

    async fn emit(&mut self, name: &str, suffix: &str, value: Value, timestamp: i64) -> Result<()> {
        let full = metric_name(self.prefix.as_deref(), [name, suffix]);
        self.client.send(&full, value, timestamp).await
    }
}
