//! Kairos reporter binary.
//!
//! - Loads `kairos.yaml` (or the path given as the first argument)
//! - Registers process-level instruments
//! - Reports to KairosDB until Ctrl-C, then sends one final report

use std::sync::Arc;
use std::time::Instant;

use tracing_subscriber::{fmt, EnvFilter};

use kairos_core::error::Result;
use kairos_reporter::{app, config, registry::MetricRegistry};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), error = %e, "kairos-reporter failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "kairos.yaml".to_string());
    let cfg = config::load_from_file(&path)?;

    let registry = Arc::new(MetricRegistry::new());
    let started = Instant::now();
    registry.gauge("kairos-reporter.uptime", move || started.elapsed().as_secs())?;

    tracing::info!(config = %path, "kairos-reporter starting");
    let handle = app::enable(&cfg, Arc::clone(&registry)).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");
    handle.stop().await;
    Ok(())
}
