use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ormetrics::{
    CollectorRegistry, ConnectionPool, DatabaseInfo, HookContext, HookFn, HookRegistrar,
    MetricsConfig, Operation, PoolStats, install,
};
use prometheus::{Registry, TextEncoder};

struct StaticPool {
    stats: PoolStats,
}

impl ConnectionPool for StaticPool {
    fn stats(&self) -> PoolStats {
        self.stats
    }
}

#[derive(Default)]
struct RecordingRegistrar {
    hooks: Vec<(Operation, String, HookFn)>,
}

impl HookRegistrar for RecordingRegistrar {
    fn register_after(&mut self, op: Operation, name: String, hook: HookFn) {
        self.hooks.push((op, name, hook));
    }
}

fn query_hook(registrar: &RecordingRegistrar) -> &HookFn {
    registrar
        .hooks
        .iter()
        .find(|(op, _, _)| *op == Operation::Query)
        .map(|(_, _, hook)| hook)
        .unwrap()
}

fn exposition(backend: &Registry) -> String {
    TextEncoder::new().encode_to_string(&backend.gather()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_install_wires_counters_gauges_and_sampler() {
    let backend = Registry::new();
    let registry = CollectorRegistry::new(backend.clone());
    let mut registrar = RecordingRegistrar::default();

    let config = MetricsConfig {
        namespace: "app".to_string(),
        scope: "myapp".to_string(),
        sample_interval: Duration::from_secs(3),
    };
    let info = DatabaseInfo {
        name: "orders".to_string(),
        driver: "postgres".to_string(),
    };
    let pool = Arc::new(StaticPool {
        stats: PoolStats {
            idle: 2,
            in_use: 3,
            open: 5,
            max_open: 10,
            ..PoolStats::default()
        },
    });

    let handle = install(config, info, &registry, pool, &mut registrar).unwrap();

    // Four hooks, named from the configured scope.
    assert_eq!(registrar.hooks.len(), 4);
    assert!(
        registrar
            .hooks
            .iter()
            .any(|(op, name, _)| *op == Operation::Query && name == "myapp:after_query")
    );

    // A registered hook drives the counters of the install's namespace; the
    // cache hands the bundle back for inspection.
    query_hook(&registrar)(&HookContext::success());
    let counters = registry.query_counters("app").unwrap();
    let counter_labels: HashMap<&str, &str> = HashMap::from([
        ("status", "success"),
        ("database", "orders"),
        ("driver", "postgres"),
    ]);
    assert_eq!(
        counters.queries.as_ref().unwrap().with(&counter_labels).get(),
        1.0
    );
    assert_eq!(counters.all.as_ref().unwrap().with(&counter_labels).get(), 1.0);

    // The spawned maintainer has published the first pool snapshot.
    tokio::task::yield_now().await;
    let gauges = registry.connection_gauges("app").unwrap();
    let gauge_labels: HashMap<&str, &str> =
        HashMap::from([("database", "orders"), ("driver", "postgres")]);
    assert_eq!(gauges.open.with(&gauge_labels).get(), 5.0);
    assert_eq!(gauges.in_use.with(&gauge_labels).get(), 3.0);
    assert_eq!(gauges.max_open.with(&gauge_labels).get(), 10.0);

    // Everything is exported through the backend under the namespace prefix.
    let output = exposition(&backend);
    assert!(output.contains(r#"app_queries_total{database="orders",driver="postgres",status="success"}"#));
    assert!(output.contains(r#"app_all_total{database="orders",driver="postgres",status="success"}"#));
    assert!(output.contains(r#"app_connections_open{database="orders",driver="postgres"}"#));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_two_installs_share_one_namespace_bundle() {
    let backend = Registry::new();
    let registry = CollectorRegistry::new(backend.clone());

    let config = MetricsConfig {
        namespace: "shared".to_string(),
        ..MetricsConfig::default()
    };

    let mut registrar_a = RecordingRegistrar::default();
    let mut registrar_b = RecordingRegistrar::default();

    // The second install for the same namespace reuses the registered
    // bundles instead of failing with a duplicate registration.
    let handle_a = install(
        config.clone(),
        DatabaseInfo {
            name: "orders".to_string(),
            driver: "postgres".to_string(),
        },
        &registry,
        Arc::new(StaticPool {
            stats: PoolStats::default(),
        }),
        &mut registrar_a,
    )
    .unwrap();
    let handle_b = install(
        config,
        DatabaseInfo {
            name: "billing".to_string(),
            driver: "postgres".to_string(),
        },
        &registry,
        Arc::new(StaticPool {
            stats: PoolStats::default(),
        }),
        &mut registrar_b,
    )
    .unwrap();

    query_hook(&registrar_a)(&HookContext::success());
    query_hook(&registrar_b)(&HookContext::success());

    // Both databases feed the same counter family, partitioned by label.
    let counters = registry.query_counters("shared").unwrap();
    let orders: HashMap<&str, &str> = HashMap::from([
        ("status", "success"),
        ("database", "orders"),
        ("driver", "postgres"),
    ]);
    let billing: HashMap<&str, &str> = HashMap::from([
        ("status", "success"),
        ("database", "billing"),
        ("driver", "postgres"),
    ]);
    assert_eq!(counters.queries.as_ref().unwrap().with(&orders).get(), 1.0);
    assert_eq!(counters.queries.as_ref().unwrap().with(&billing).get(), 1.0);

    handle_a.shutdown().await;
    handle_b.shutdown().await;
}
