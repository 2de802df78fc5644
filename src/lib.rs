// src/lib.rs

//! Prometheus instrumentation for ORM-driven database access.
//!
//! Exposes per-operation query counters and connection-pool gauges. Bundles
//! of metric handles are cached per namespace by an explicit
//! [`CollectorRegistry`], callback handlers translate completed-operation
//! hooks into counter increments, and a background task periodically samples
//! live pool statistics into the gauges.

pub mod config;
pub mod core;
pub mod plugin;

// Re-export
pub use crate::config::{DatabaseInfo, MetricsConfig};
pub use crate::core::collectors::{CollectorRegistry, ConnectionGauges, QueryCounters};
pub use crate::core::database::{ConnectionPool, DatabaseBinding, PoolStats};
pub use crate::core::errors::MetricsError;
pub use crate::core::handler::{
    CallbackHandler, HookContext, HookFn, HookRegistrar, Operation,
};
pub use crate::core::tasks::stats::StatsMaintainer;
pub use crate::plugin::{InstrumentationHandle, install};
