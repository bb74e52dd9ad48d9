//! Metric filter predicates.

use regex::Regex;
use serde::Deserialize;

use kairos_core::error::{KairosError, Result};

use crate::registry::metrics::Metric;

/// Decides whether a metric is included in a report.
pub trait MetricFilter: Send + Sync {
    fn matches(&self, name: &str, metric: &Metric) -> bool;
}

impl<F> MetricFilter for F
where
    F: Fn(&str, &Metric) -> bool + Send + Sync,
{
    fn matches(&self, name: &str, metric: &Metric) -> bool {
        self(name, metric)
    }
}

/// Accepts every metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllMetrics;

impl MetricFilter for AllMetrics {
    fn matches(&self, _name: &str, _metric: &Metric) -> bool {
        true
    }
}

/// White lists keep matching names; black lists drop them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PatternColor {
    #[default]
    White,
    Black,
}

/// Regex-based name filter.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    color: PatternColor,
    patterns: Vec<Regex>,
}

impl PatternFilter {
    pub fn new(color: PatternColor, patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p)
                    .map_err(|e| KairosError::Config(format!("invalid predicate pattern {p:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { color, patterns })
    }
}

impl MetricFilter for PatternFilter {
    fn matches(&self, name: &str, _metric: &Metric) -> bool {
        let hit = self.patterns.iter().any(|p| p.is_match(name));
        match self.color {
            PatternColor::White => hit,
            PatternColor::Black => !hit,
        }
    }
}
