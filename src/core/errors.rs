// src/core/errors.rs

//! Defines the primary error type for the crate.

use thiserror::Error;

/// The main error enum, representing all possible setup failures.
///
/// Run-time paths never produce one of these: counter increments and gauge
/// samples are infallible, and a failed query is absorbed into a `status`
/// label value by the callback handler rather than propagated.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// The metrics backend rejected a collector, typically because a metric
    /// with the same fully-qualified name is already registered outside this
    /// crate's cache. Nothing is cached for the namespace, so the call may
    /// be retried once the conflict is resolved.
    #[error("Metric registration failed: {0}")]
    Registration(#[from] prometheus::Error),
}
