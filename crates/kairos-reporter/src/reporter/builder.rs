use std::sync::Arc;

use kairos_core::error::Result;
use kairos_core::TagSet;

use crate::registry::{system_clock, AllMetrics, Clock, MetricFilter, MetricRegistry};
use crate::reporter::kairos::Reporter;
use crate::transport::KairosClient;
use crate::units::TimeUnit;

/// Builder for [`Reporter`].
///
/// Defaults: no prefix, system clock, rates per second, durations in
/// milliseconds, every metric reported, no tags.
pub struct ReporterBuilder {
    registry: Arc<MetricRegistry>,
    clock: Arc<dyn Clock>,
    prefix: Option<String>,
    rate_unit: TimeUnit,
    duration_unit: TimeUnit,
    filter: Arc<dyn MetricFilter>,
    tags: TagSet,
}

impl ReporterBuilder {
    pub(crate) fn new(registry: Arc<MetricRegistry>) -> Self {
        Self {
            registry,
            clock: system_clock(),
            prefix: None,
            rate_unit: TimeUnit::Seconds,
            duration_unit: TimeUnit::Milliseconds,
            filter: Arc::new(AllMetrics),
            tags: TagSet::new(),
        }
    }

    /// Clock used for sample timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Prefix every metric name.
    pub fn prefixed_with(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn convert_rates_to(mut self, unit: TimeUnit) -> Self {
        self.rate_unit = unit;
        self
    }

    pub fn convert_durations_to(mut self, unit: TimeUnit) -> Self {
        self.duration_unit = unit;
        self
    }

    /// Only report metrics accepted by `filter`.
    pub fn filter(mut self, filter: impl MetricFilter + 'static) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    /// Add a tag to every sample. Fails fast on an invalid name or value.
    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        self.tags.insert(name, value)?;
        Ok(self)
    }

    /// Merge an already validated tag set.
    pub fn with_tags(mut self, tags: TagSet) -> Self {
        for (k, v) in tags.iter() {
            // Names and values are already valid, so this cannot fail.
            let _ = self.tags.insert(k, v);
        }
        self
    }

    /// Hand the tags to `client` and build the reporter around it.
    pub fn build<C: KairosClient>(self, mut client: C) -> Reporter<C> {
        client.set_tags(self.tags);
        Reporter {
            registry: self.registry,
            client,
            clock: self.clock,
            prefix: self.prefix,
            rate_unit: self.rate_unit,
            duration_unit: self.duration_unit,
            filter: self.filter,
        }
    }
}
