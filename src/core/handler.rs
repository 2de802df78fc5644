// src/core/handler.rs

//! Callback handling for ORM lifecycle hooks so query statistics are always
//! up to date.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::Arc;

use prometheus::CounterVec;

use crate::config::{DatabaseInfo, MetricsConfig};
use crate::core::collectors::QueryCounters;
use crate::core::labels::{
    LABEL_DATABASE, LABEL_DRIVER, LABEL_STATUS, STATUS_FAIL, STATUS_SUCCESS,
};

/// The four operation kinds with an after-hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Delete,
    Query,
    Update,
}

impl Operation {
    /// Every operation kind, in registration order.
    pub const ALL: [Operation; 4] = [
        Operation::Create,
        Operation::Delete,
        Operation::Query,
        Operation::Update,
    ];

    /// The hook-point suffix for this operation, e.g. `"after_create"`.
    pub fn hook_suffix(self) -> &'static str {
        match self {
            Operation::Create => "after_create",
            Operation::Delete => "after_delete",
            Operation::Query => "after_query",
            Operation::Update => "after_update",
        }
    }
}

/// Context describing a completed operation, handed to a hook by the host's
/// adapter layer.
#[derive(Clone, Debug, Default)]
pub struct HookContext {
    error: Option<Arc<dyn StdError + Send + Sync>>,
}

impl HookContext {
    /// A context for an operation that completed without an error.
    pub fn success() -> Self {
        Self { error: None }
    }

    /// A context carrying the error of a failed operation.
    pub fn failure(error: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            error: Some(Arc::new(error)),
        }
    }

    /// The error of the completed operation, if any.
    pub fn error(&self) -> Option<&(dyn StdError + Send + Sync)> {
        self.error.as_deref()
    }

    /// Whether the completed operation carried an error.
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// A hook closure invoked after an operation completes.
pub type HookFn = Arc<dyn Fn(&HookContext) + Send + Sync>;

/// Hook registration seam implemented by ORM adapter layers.
///
/// The metrics core depends only on this trait. An adapter translates the
/// four registrations onto its ORM's native callback mechanism and invokes
/// the registered hook after the corresponding lifecycle point, on whatever
/// execution context ran the query.
pub trait HookRegistrar {
    /// Registers `hook` under `name` to run after operations of kind `op`.
    fn register_after(&mut self, op: Operation, name: String, hook: HookFn);
}

/// Increments query counters from completed-operation hooks.
///
/// Stateless per invocation: each hook call performs exactly one increment
/// of the operation counter and one of the aggregate counter, synchronously
/// with the caller.
pub struct CallbackHandler {
    config: MetricsConfig,
    counters: Arc<QueryCounters>,
    default_labels: HashMap<&'static str, String>,
}

impl CallbackHandler {
    /// Creates a handler for one database. `info` sets the `driver` and
    /// `database` label values merged into every emitted label set.
    pub fn new(config: MetricsConfig, info: &DatabaseInfo, counters: Arc<QueryCounters>) -> Self {
        let default_labels = HashMap::from([
            (LABEL_DRIVER, info.driver.clone()),
            (LABEL_DATABASE, info.name.clone()),
        ]);
        Self {
            config,
            counters,
            default_labels,
        }
    }

    /// Registers the four after-operation hooks with `registrar`, each named
    /// `"<scope>:<suffix>"` from the configured scope.
    pub fn attach(self: &Arc<Self>, registrar: &mut dyn HookRegistrar) {
        for op in Operation::ALL {
            let handler = Arc::clone(self);
            let name = self.config.hook_name(op);
            registrar.register_after(op, name, Arc::new(move |ctx| handler.after(op, ctx)));
        }
    }

    pub fn after_create(&self, ctx: &HookContext) {
        self.after(Operation::Create, ctx);
    }

    pub fn after_delete(&self, ctx: &HookContext) {
        self.after(Operation::Delete, ctx);
    }

    pub fn after_query(&self, ctx: &HookContext) {
        self.after(Operation::Query, ctx);
    }

    pub fn after_update(&self, ctx: &HookContext) {
        self.after(Operation::Update, ctx);
    }

    /// Increments the counter for `op` and the aggregate counter, labeled
    /// with the outcome in `ctx`. Absent counters are skipped.
    pub fn after(&self, op: Operation, ctx: &HookContext) {
        let counter = match op {
            Operation::Create => self.counters.creates.as_ref(),
            Operation::Delete => self.counters.deletes.as_ref(),
            Operation::Query => self.counters.queries.as_ref(),
            Operation::Update => self.counters.updates.as_ref(),
        };
        self.update_counters(ctx, &[counter, self.counters.all.as_ref()]);
    }

    fn update_counters(&self, ctx: &HookContext, vectors: &[Option<&CounterVec>]) {
        let status = if ctx.is_failure() {
            STATUS_FAIL
        } else {
            STATUS_SUCCESS
        };

        let mut labels = HashMap::from([(LABEL_STATUS, status.to_string())]);
        merge_labels(&mut labels, &self.default_labels);
        let label_values: HashMap<&str, &str> = labels
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect();

        for vector in vectors {
            let Some(counter) = vector else { continue };
            counter.with(&label_values).inc();
        }
    }
}

/// Copies entries of `defaults` into `labels`. Keys already present in
/// `labels` are never overwritten, so an explicit `status` always survives
/// the merge.
fn merge_labels(
    labels: &mut HashMap<&'static str, String>,
    defaults: &HashMap<&'static str, String>,
) {
    for (key, value) in defaults {
        labels.entry(*key).or_insert_with(|| value.clone());
    }
}
