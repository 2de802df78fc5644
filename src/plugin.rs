// src/plugin.rs

//! One-call wiring of query counters, connection gauges, and the periodic
//! stats task for a single database.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::{DatabaseInfo, MetricsConfig};
use crate::core::collectors::CollectorRegistry;
use crate::core::database::{ConnectionPool, DatabaseBinding};
use crate::core::errors::MetricsError;
use crate::core::handler::{CallbackHandler, HookRegistrar};
use crate::core::tasks::stats::StatsMaintainer;

/// Instruments one database.
///
/// Fetches (or reuses) the metric bundles for the configured namespace,
/// attaches the callback handler to `registrar`, and spawns a maintainer
/// task sampling `pool` on the configured interval. Must be called from
/// within a tokio runtime.
///
/// A registration conflict aborts the installation for this namespace and
/// is returned to the caller; nothing is cached, so the call can be retried.
pub fn install(
    config: MetricsConfig,
    info: DatabaseInfo,
    registry: &CollectorRegistry,
    pool: Arc<dyn ConnectionPool>,
    registrar: &mut dyn HookRegistrar,
) -> Result<InstrumentationHandle, MetricsError> {
    let counters = registry.query_counters(&config.namespace)?;
    let gauges = registry.connection_gauges(&config.namespace)?;

    let handler = Arc::new(CallbackHandler::new(config.clone(), &info, counters));
    handler.attach(registrar);

    let binding = Arc::new(DatabaseBinding::new(&info, pool));
    let maintainer = StatsMaintainer::new(binding, gauges, config.sample_interval);

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let task = tokio::spawn(maintainer.run(shutdown_rx));
    debug!(
        database = %info.name,
        driver = %info.driver,
        "Database instrumentation installed."
    );

    Ok(InstrumentationHandle {
        handler,
        shutdown_tx,
        task,
    })
}

/// Keeps an installed instrumentation alive and shuts it down on demand.
pub struct InstrumentationHandle {
    handler: Arc<CallbackHandler>,
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl InstrumentationHandle {
    /// The callback handler attached by [`install`], for hosts that invoke
    /// the after-hooks inline instead of through a registrar.
    pub fn handler(&self) -> &Arc<CallbackHandler> {
        &self.handler
    }

    /// Signals the maintainer task to stop and waits for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }
}
