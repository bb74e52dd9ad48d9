use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use kairos_core::error::{KairosError, Result};
use kairos_core::TagSet;

use crate::host::resolve_host_template;
use crate::registry::{PatternColor, PatternFilter};
use crate::units::TimeUnit;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReporterConfig {
    pub version: u32,

    pub kairosdb: KairosSection,
}

impl ReporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(KairosError::UnsupportedVersion);
        }

        self.kairosdb.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KairosSection {
    /// `host:port` entries; only the first one is used.
    #[serde(default)]
    pub hosts: Vec<String>,

    #[serde(default = "default_period_ms")]
    pub period_ms: u64,

    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default = "default_rate_unit")]
    pub rate_unit: TimeUnit,

    #[serde(default = "default_duration_unit")]
    pub duration_unit: TimeUnit,

    /// Tag values may use `${host.name}` / `${host.name.short}`.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(default)]
    pub predicate: Option<PredicateConfig>,
}

impl KairosSection {
    pub fn validate(&self) -> Result<()> {
        if self.hosts.is_empty() {
            return Err(KairosError::NoHostConfigured);
        }
        for h in &self.hosts {
            HostPort::parse(h)?;
        }
        if !(1_000..=86_400_000).contains(&self.period_ms) {
            return Err(KairosError::Config(
                "kairosdb.period_ms must be between 1000 and 86400000".into(),
            ));
        }
        if let Some(prefix) = &self.prefix {
            if prefix.trim().is_empty() {
                return Err(KairosError::Config(
                    "kairosdb.prefix must not be blank".into(),
                ));
            }
        }

        self.resolved_tags()?;
        self.filter()?;

        Ok(())
    }

    /// First configured host. Extra hosts are ignored with a warning.
    pub fn primary_host(&self) -> Result<HostPort> {
        let first = self.hosts.first().ok_or(KairosError::NoHostConfigured)?;
        let host = HostPort::parse(first)?;
        if self.hosts.len() > 1 {
            tracing::warn!(host = %host, "multiple hosts specified; only the first one is used");
        }
        Ok(host)
    }

    /// Tags with host placeholders expanded, validated.
    pub fn resolved_tags(&self) -> Result<TagSet> {
        let mut tags = TagSet::new();
        for (k, v) in &self.tags {
            tags.insert(k.as_str(), resolve_host_template(v)?)?;
        }
        Ok(tags)
    }

    /// Compiled predicate, if one is configured.
    pub fn filter(&self) -> Result<Option<PatternFilter>> {
        self.predicate.as_ref().map(PredicateConfig::compile).transpose()
    }
}

fn default_period_ms() -> u64 {
    60_000
}
fn default_rate_unit() -> TimeUnit {
    TimeUnit::Seconds
}
fn default_duration_unit() -> TimeUnit {
    TimeUnit::Milliseconds
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredicateConfig {
    #[serde(default)]
    pub color: PatternColor,

    #[serde(default)]
    pub patterns: Vec<String>,
}

impl PredicateConfig {
    pub fn compile(&self) -> Result<PatternFilter> {
        PatternFilter::new(self.color, &self.patterns)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPort {
    pub host: String,
    pub port: u16,
}

impl HostPort {
    /// Parse `host:port`. IPv6 literals go in brackets: `[::1]:4242`.
    pub fn parse(s: &str) -> Result<Self> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| KairosError::Config(format!("invalid host {s:?} (expected host:port)")))?;

        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(KairosError::Config(format!("invalid host {s:?}: empty host name")));
        }

        let port: u16 = port
            .parse()
            .map_err(|_| KairosError::Config(format!("invalid host {s:?}: bad port")))?;
        if port == 0 {
            return Err(KairosError::Config(format!("invalid host {s:?}: port must not be 0")));
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
