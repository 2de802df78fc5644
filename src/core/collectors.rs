// src/core/collectors.rs

//! The process-wide collector cache and the metric bundle factories.
//!
//! Bundles are created lazily on first request for a namespace, registered
//! with the backend exactly once, and handed out as shared references for
//! the rest of the process lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use prometheus::core::Collector;
use prometheus::{CounterVec, GaugeVec, Opts, Registry};

use crate::core::errors::MetricsError;
use crate::core::labels::*;

/// Per-operation query counters exported for one namespace.
///
/// All counters carry the `database`, `driver`, and `status` labels. Fields
/// are optional so partial bundles can be assembled; the callback handler
/// skips absent counters instead of faulting.
#[derive(Clone, Debug)]
pub struct QueryCounters {
    pub all: Option<CounterVec>,
    pub creates: Option<CounterVec>,
    pub deletes: Option<CounterVec>,
    pub queries: Option<CounterVec>,
    pub updates: Option<CounterVec>,
}

/// Gauges reflecting the latest connection-pool snapshot for one namespace,
/// labeled by `database` and `driver`.
#[derive(Clone, Debug)]
pub struct ConnectionGauges {
    pub idle: GaugeVec,
    pub in_use: GaugeVec,
    pub open: GaugeVec,
    pub max_open: GaugeVec,
    pub waited_for: GaugeVec,
    pub blocked_seconds: GaugeVec,
    pub closed_max_idle: GaugeVec,
    pub closed_max_lifetime: GaugeVec,
}

struct CounterVecCreator {
    namespace: String,
    labels: Vec<&'static str>,
}

impl CounterVecCreator {
    fn create(&self, name: &str, help: &str) -> Result<CounterVec, MetricsError> {
        let opts = Opts::new(name, help).namespace(self.namespace.clone());
        Ok(CounterVec::new(opts, &self.labels)?)
    }
}

struct GaugeVecCreator {
    namespace: String,
    labels: Vec<&'static str>,
}

impl GaugeVecCreator {
    fn create(&self, name: &str, help: &str) -> Result<GaugeVec, MetricsError> {
        let opts = Opts::new(name, help).namespace(self.namespace.clone());
        Ok(GaugeVec::new(opts, &self.labels)?)
    }
}

/// Both bundle maps live behind the registry's single lock.
#[derive(Default)]
struct CollectorCache {
    query: HashMap<String, Arc<QueryCounters>>,
    database: HashMap<String, Arc<ConnectionGauges>>,
}

/// Process-wide cache of metric bundles, keyed by namespace.
///
/// The first caller for a namespace registers the bundle with the backend
/// registry; every later caller, concurrent or not, gets the same bundle
/// back without re-registering. The whole check-create-store sequence for a
/// namespace runs under one lock shared across both bundle types, and the
/// lock is never held across I/O.
///
/// The registry is an explicit value passed to every setup path rather than
/// an ambient singleton; construct it once at process start and share it.
pub struct CollectorRegistry {
    backend: Registry,
    cache: Mutex<CollectorCache>,
}

impl CollectorRegistry {
    /// Creates a cache that registers collectors against `backend`.
    pub fn new(backend: Registry) -> Self {
        Self {
            backend,
            cache: Mutex::new(CollectorCache::default()),
        }
    }

    /// The backend registry collectors are registered with.
    pub fn backend(&self) -> &Registry {
        &self.backend
    }

    /// Returns the query counter bundle for `namespace`, creating and
    /// registering it on first use.
    ///
    /// On a registration conflict nothing is cached and the error is
    /// returned; a later call for the same namespace retries registration
    /// from scratch.
    pub fn query_counters(&self, namespace: &str) -> Result<Arc<QueryCounters>, MetricsError> {
        let mut cache = self.cache.lock();
        if let Some(existing) = cache.query.get(namespace) {
            return Ok(Arc::clone(existing));
        }

        let creator = CounterVecCreator {
            namespace: namespace.to_owned(),
            labels: vec![LABEL_DATABASE, LABEL_DRIVER, LABEL_STATUS],
        };

        let all = creator.create(METRIC_ALL_TOTAL, HELP_ALL_TOTAL)?;
        let creates = creator.create(METRIC_CREATES_TOTAL, HELP_CREATES_TOTAL)?;
        let deletes = creator.create(METRIC_DELETES_TOTAL, HELP_DELETES_TOTAL)?;
        let queries = creator.create(METRIC_QUERIES_TOTAL, HELP_QUERIES_TOTAL)?;
        let updates = creator.create(METRIC_UPDATES_TOTAL, HELP_UPDATES_TOTAL)?;

        register_collectors(
            &self.backend,
            &[
                all.clone(),
                creates.clone(),
                deletes.clone(),
                queries.clone(),
                updates.clone(),
            ],
        )?;

        let bundle = Arc::new(QueryCounters {
            all: Some(all),
            creates: Some(creates),
            deletes: Some(deletes),
            queries: Some(queries),
            updates: Some(updates),
        });
        cache.query.insert(namespace.to_owned(), Arc::clone(&bundle));
        Ok(bundle)
    }

    /// Returns the connection gauge bundle for `namespace`, creating and
    /// registering it on first use.
    ///
    /// Same caching and failure contract as [`Self::query_counters`].
    pub fn connection_gauges(
        &self,
        namespace: &str,
    ) -> Result<Arc<ConnectionGauges>, MetricsError> {
        let mut cache = self.cache.lock();
        if let Some(existing) = cache.database.get(namespace) {
            return Ok(Arc::clone(existing));
        }

        let creator = GaugeVecCreator {
            namespace: namespace.to_owned(),
            labels: vec![LABEL_DATABASE, LABEL_DRIVER],
        };

        let gauges = ConnectionGauges {
            idle: creator.create(METRIC_IDLE_CONNECTIONS, HELP_IDLE_CONNECTIONS)?,
            in_use: creator.create(METRIC_IN_USE_CONNECTIONS, HELP_IN_USE_CONNECTIONS)?,
            open: creator.create(METRIC_OPEN_CONNECTIONS, HELP_OPEN_CONNECTIONS)?,
            max_open: creator.create(METRIC_MAX_OPEN_CONNECTIONS, HELP_MAX_OPEN_CONNECTIONS)?,
            waited_for: creator
                .create(METRIC_WAITED_FOR_CONNECTIONS, HELP_WAITED_FOR_CONNECTIONS)?,
            blocked_seconds: creator.create(
                METRIC_BLOCKED_SECONDS_CONNECTIONS,
                HELP_BLOCKED_SECONDS_CONNECTIONS,
            )?,
            closed_max_idle: creator.create(
                METRIC_CLOSED_MAX_IDLE_CONNECTIONS,
                HELP_CLOSED_MAX_IDLE_CONNECTIONS,
            )?,
            closed_max_lifetime: creator.create(
                METRIC_CLOSED_MAX_LIFETIME_CONNECTIONS,
                HELP_CLOSED_MAX_LIFETIME_CONNECTIONS,
            )?,
        };

        register_collectors(
            &self.backend,
            &[
                gauges.idle.clone(),
                gauges.in_use.clone(),
                gauges.open.clone(),
                gauges.max_open.clone(),
                gauges.waited_for.clone(),
                gauges.blocked_seconds.clone(),
                gauges.closed_max_idle.clone(),
                gauges.closed_max_lifetime.clone(),
            ],
        )?;

        let bundle = Arc::new(gauges);
        cache.database.insert(namespace.to_owned(), Arc::clone(&bundle));
        Ok(bundle)
    }
}

/// Registers collectors one by one. If any registration fails, collectors
/// registered earlier in the same batch are unregistered before the error is
/// returned, so a retry for the namespace starts from a clean slate.
fn register_collectors<C>(backend: &Registry, collectors: &[C]) -> Result<(), MetricsError>
where
    C: Collector + Clone + 'static,
{
    for (index, collector) in collectors.iter().enumerate() {
        if let Err(err) = backend.register(Box::new(collector.clone())) {
            for registered in &collectors[..index] {
                let _ = backend.unregister(Box::new(registered.clone()));
            }
            return Err(err.into());
        }
    }
    Ok(())
}
