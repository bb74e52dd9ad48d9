//! YAML config for the reporter.
//!
//! Loading fails unless every host parses as `host:port`, the tag templates
//! expand to valid tags and the predicate patterns compile, so `app::enable`
//! never sees a config it cannot start from.

pub mod schema;

use std::fs;

use kairos_core::error::{KairosError, Result};

pub use schema::{HostPort, KairosSection, PredicateConfig, ReporterConfig};

pub fn load_from_file(path: &str) -> Result<ReporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| KairosError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ReporterConfig> {
    let cfg: ReporterConfig = serde_yaml::from_str(s)
        .map_err(|e| KairosError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
