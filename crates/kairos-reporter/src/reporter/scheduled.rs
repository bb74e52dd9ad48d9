use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};

use crate::reporter::kairos::Reporter;
use crate::transport::KairosClient;

/// Handle to a running periodic reporter.
///
/// Dropping the handle also stops the reporter, after one final report.
pub struct ReporterHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReporterHandle {
    /// Signal shutdown and wait for the final report to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "reporter task failed");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<C: KairosClient + 'static> Reporter<C> {
    /// Report every `period` on a tokio task, first one `period` from now.
    ///
    /// Ticks never overlap; a slow tick delays the next one.
    pub fn start(self, period: Duration) -> ReporterHandle {
        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(self.run(period, rx));
        ReporterHandle { shutdown, task }
    }

    async fn run(mut self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            server = %self.client.endpoint(),
            period_ms = period.as_millis() as u64,
            "reporter loop started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => self.report().await,
                _ = shutdown.changed() => break,
            }
        }

        self.report().await;
        tracing::info!(server = %self.client.endpoint(), "reporter stopped");
    }
}
