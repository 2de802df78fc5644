// src/core/database.rs

//! Wraps a live connection pool so its statistics can be published as
//! gauges.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::DatabaseInfo;
use crate::core::collectors::ConnectionGauges;
use crate::core::labels::{LABEL_DATABASE, LABEL_DRIVER};

/// Point-in-time statistics reported by a connection pool.
///
/// Counts are absolute values, not deltas; the cumulative fields grow
/// monotonically over the pool's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Connections currently idle in the pool.
    pub idle: u64,
    /// Connections currently handed out.
    pub in_use: u64,
    /// Connections currently open (idle plus in use).
    pub open: u64,
    /// Configured upper bound on open connections.
    pub max_open: u64,
    /// Cumulative number of times a caller waited for a connection.
    pub wait_count: u64,
    /// Cumulative time callers spent blocked waiting for a connection.
    pub wait_duration: Duration,
    /// Cumulative connections closed because of the idle limit.
    pub max_idle_closed: u64,
    /// Cumulative connections closed because of the lifetime limit.
    pub max_lifetime_closed: u64,
}

/// A live connection pool that can report statistics about itself.
///
/// A pool is assumed always readable once constructed; `stats` has no error
/// path. The pool implementation is responsible for its own internal
/// synchronization.
pub trait ConnectionPool: Send + Sync {
    /// Returns a snapshot of the pool's current statistics.
    fn stats(&self) -> PoolStats;
}

/// Pairs a pool handle with the metadata identifying it in metric labels.
///
/// The binding caches nothing between samples; statistics are read from the
/// pool on every call.
pub struct DatabaseBinding {
    name: String,
    driver: String,
    pool: Arc<dyn ConnectionPool>,
    lock: Mutex<()>,
}

impl DatabaseBinding {
    /// Creates a binding for `pool` labeled with `info`.
    pub fn new(info: &DatabaseInfo, pool: Arc<dyn ConnectionPool>) -> Self {
        Self {
            name: info.name.clone(),
            driver: info.driver.clone(),
            pool,
            lock: Mutex::new(()),
        }
    }

    /// Reads the pool's statistics and sets the eight gauges in `gauges` to
    /// the snapshot values, labeled with this binding's database and driver.
    ///
    /// The whole read-and-publish sequence holds the binding's lock, so two
    /// samples of the same binding never interleave. Gauges are overwritten
    /// with the latest absolute values on every call.
    pub fn sample(&self, gauges: &ConnectionGauges) {
        let _guard = self.lock.lock();

        let labels: HashMap<&str, &str> = HashMap::from([
            (LABEL_DATABASE, self.name.as_str()),
            (LABEL_DRIVER, self.driver.as_str()),
        ]);

        let stats = self.pool.stats();

        gauges.idle.with(&labels).set(stats.idle as f64);
        gauges.in_use.with(&labels).set(stats.in_use as f64);
        gauges.open.with(&labels).set(stats.open as f64);
        gauges.max_open.with(&labels).set(stats.max_open as f64);
        gauges.waited_for.with(&labels).set(stats.wait_count as f64);
        gauges
            .blocked_seconds
            .with(&labels)
            .set(stats.wait_duration.as_secs_f64());
        gauges
            .closed_max_idle
            .with(&labels)
            .set(stats.max_idle_closed as f64);
        gauges
            .closed_max_lifetime
            .with(&labels)
            .set(stats.max_lifetime_closed as f64);
    }
}

#[cfg(feature = "sqlx")]
impl<DB: sqlx::Database> ConnectionPool for sqlx::Pool<DB> {
    /// Maps the statistics sqlx exposes onto a snapshot. sqlx does not track
    /// wait or close counters, so those fields stay zero.
    fn stats(&self) -> PoolStats {
        let open = u64::from(self.size());
        let idle = self.num_idle() as u64;
        PoolStats {
            idle,
            in_use: open.saturating_sub(idle),
            open,
            max_open: u64::from(self.options().get_max_connections()),
            ..PoolStats::default()
        }
    }
}
