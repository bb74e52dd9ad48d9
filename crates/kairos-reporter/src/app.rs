//! Wiring from config to a running reporter.
//!
//! Makes startup errors explicit (Result instead of panic): a bad tag,
//! missing host or unreachable server is reported before any tick runs.

use std::sync::Arc;
use std::time::Duration;

use kairos_core::error::Result;

use crate::config::ReporterConfig;
use crate::registry::MetricRegistry;
use crate::reporter::{Reporter, ReporterHandle};
use crate::transport::{KairosClient, KairosDb};

/// Start reporting `registry` to the first configured host over TCP.
pub async fn enable(cfg: &ReporterConfig, registry: Arc<MetricRegistry>) -> Result<ReporterHandle> {
    let host = cfg.kairosdb.primary_host()?;
    let client = KairosDb::new(host.host, host.port);
    enable_with_client(cfg, registry, client).await
}

/// Start reporting `registry` through an arbitrary client.
///
/// The client is connected once up front to prove the endpoint is
/// reachable, then closed again; every tick reconnects.
pub async fn enable_with_client<C>(
    cfg: &ReporterConfig,
    registry: Arc<MetricRegistry>,
    mut client: C,
) -> Result<ReporterHandle>
where
    C: KairosClient + 'static,
{
    let section = &cfg.kairosdb;
    let tags = section.resolved_tags()?;

    let endpoint = client.connect().await?;
    client.close().await?;

    let mut builder = Reporter::for_registry(registry)
        .convert_rates_to(section.rate_unit)
        .convert_durations_to(section.duration_unit)
        .with_tags(tags);
    if let Some(prefix) = &section.prefix {
        builder = builder.prefixed_with(prefix.as_str());
    }
    if let Some(filter) = section.filter()? {
        builder = builder.filter(filter);
    }

    let handle = builder
        .build(client)
        .start(Duration::from_millis(section.period_ms));

    tracing::info!(
        %endpoint,
        period_ms = section.period_ms,
        rate_unit = section.rate_unit.as_str(),
        duration_unit = section.duration_unit.as_str(),
        "kairosdb reporter started"
    );
    Ok(handle)
}
