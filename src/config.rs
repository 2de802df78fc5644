// src/config.rs

//! Configuration for the instrumentation: metric namespace, hook scope, and
//! sampling cadence.

use crate::core::handler::Operation;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options controlling how metrics are named and how often connection-pool
/// statistics are sampled.
///
/// Hosts typically embed this struct in their own configuration tree; every
/// field has a default so an empty table is valid.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MetricsConfig {
    /// Prefix for every exported metric name. Empty means no prefix.
    /// Namespaces are compared byte-for-byte; no normalization is applied,
    /// so two namespaces differing by whitespace are distinct.
    #[serde(default)]
    pub namespace: String,

    /// Scope string distinguishing multiple attachments in one process.
    /// Hook names are built as `"<scope>:<suffix>"`.
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Interval between two connection-pool samples.
    #[serde(default = "default_sample_interval", with = "humantime_serde")]
    pub sample_interval: Duration,
}

impl MetricsConfig {
    /// Builds the deterministic hook name for an operation, e.g.
    /// `"myapp:after_create"` for scope `"myapp"`.
    pub fn hook_name(&self, op: Operation) -> String {
        format!("{}:{}", self.scope, op.hook_suffix())
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            scope: default_scope(),
            sample_interval: default_sample_interval(),
        }
    }
}

fn default_scope() -> String {
    "ormetrics".to_string()
}

fn default_sample_interval() -> Duration {
    Duration::from_secs(3)
}

/// Identifying metadata for one instrumented database connection.
///
/// None of the fields are mandatory for the instrumentation to function;
/// they set the `database` and `driver` label values that partition the
/// exported series.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DatabaseInfo {
    /// Display name of the database.
    pub name: String,
    /// Name of the driver powering the connection pool.
    pub driver: String,
}
