// src/core/tasks/stats.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::core::collectors::ConnectionGauges;
use crate::core::database::DatabaseBinding;

/// A task that periodically publishes connection-pool statistics into a
/// gauge bundle.
pub struct StatsMaintainer {
    binding: Arc<DatabaseBinding>,
    gauges: Arc<ConnectionGauges>,
    interval: Duration,
}

impl StatsMaintainer {
    /// Creates a new `StatsMaintainer` sampling `binding` every `interval`.
    pub fn new(
        binding: Arc<DatabaseBinding>,
        gauges: Arc<ConnectionGauges>,
        interval: Duration,
    ) -> Self {
        Self {
            binding,
            gauges,
            interval,
        }
    }

    /// Runs the main loop for the maintainer task.
    ///
    /// Samples on every tick until the shutdown channel fires. Missed ticks
    /// are skipped, not caught up. Each sample overwrites the previous one,
    /// so a second maintainer for the same binding double-samples without
    /// corrupting the gauges.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!(
            "Connection stats maintainer started. Sample interval: {:?}",
            self.interval
        );
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.binding.sample(&self.gauges);
                }
                _ = shutdown_rx.recv() => {
                    info!("Connection stats maintainer shutting down.");
                    return;
                }
            }
        }
    }
}
