// src/core/labels.rs

//! Fixed vocabulary of metric names, help texts, and label keys.
//!
//! Metric names are part of the exported surface and must not change.

pub const LABEL_STATUS: &str = "status";
pub const LABEL_DATABASE: &str = "database";
pub const LABEL_DRIVER: &str = "driver";

/// Outcomes for query metrics (values of `LABEL_STATUS`).
pub const STATUS_FAIL: &str = "fail";
pub const STATUS_SUCCESS: &str = "success";

pub const METRIC_OPEN_CONNECTIONS: &str = "connections_open";
pub const METRIC_IDLE_CONNECTIONS: &str = "connections_idle";
pub const METRIC_IN_USE_CONNECTIONS: &str = "connections_in_use";
pub const METRIC_MAX_OPEN_CONNECTIONS: &str = "connections_max_open";
pub const METRIC_WAITED_FOR_CONNECTIONS: &str = "connections_wait_for";
pub const METRIC_BLOCKED_SECONDS_CONNECTIONS: &str = "connections_blocked_seconds";
pub const METRIC_CLOSED_MAX_IDLE_CONNECTIONS: &str = "connections_closed_max_idle";
pub const METRIC_CLOSED_MAX_LIFETIME_CONNECTIONS: &str = "connections_closed_max_lifetime";

pub const HELP_OPEN_CONNECTIONS: &str = "Currently open connections to the database";
pub const HELP_IDLE_CONNECTIONS: &str = "Currently idle connections to the database";
pub const HELP_IN_USE_CONNECTIONS: &str = "Currently in use connections";
pub const HELP_MAX_OPEN_CONNECTIONS: &str =
    "Maximum number of open connections to the database";
pub const HELP_WAITED_FOR_CONNECTIONS: &str =
    "Total number of times a connection was waited for";
pub const HELP_BLOCKED_SECONDS_CONNECTIONS: &str =
    "Total time blocked waiting for a new connection";
pub const HELP_CLOSED_MAX_IDLE_CONNECTIONS: &str =
    "Total number of connections closed due to the idle connection limit";
pub const HELP_CLOSED_MAX_LIFETIME_CONNECTIONS: &str =
    "Total number of connections closed due to the connection lifetime limit";

pub const METRIC_ALL_TOTAL: &str = "all_total";
pub const METRIC_CREATES_TOTAL: &str = "creates_total";
pub const METRIC_DELETES_TOTAL: &str = "deletes_total";
pub const METRIC_QUERIES_TOTAL: &str = "queries_total";
pub const METRIC_UPDATES_TOTAL: &str = "updates_total";

pub const HELP_ALL_TOTAL: &str = "All queries requested";
pub const HELP_CREATES_TOTAL: &str = "All create queries requested";
pub const HELP_DELETES_TOTAL: &str = "All delete queries requested";
pub const HELP_QUERIES_TOTAL: &str = "All select queries requested";
pub const HELP_UPDATES_TOTAL: &str = "All update queries requested";
