use std::time::Duration;

use ormetrics::{MetricsConfig, Operation};

#[tokio::test]
async fn test_defaults() {
    let config = MetricsConfig::default();
    assert_eq!(config.namespace, "");
    assert_eq!(config.scope, "ormetrics");
    assert_eq!(config.sample_interval, Duration::from_secs(3));
}

#[tokio::test]
async fn test_hook_names_follow_scope_and_operation() {
    let config = MetricsConfig {
        scope: "myapp".to_string(),
        ..MetricsConfig::default()
    };
    assert_eq!(config.hook_name(Operation::Create), "myapp:after_create");
    assert_eq!(config.hook_name(Operation::Delete), "myapp:after_delete");
    assert_eq!(config.hook_name(Operation::Query), "myapp:after_query");
    assert_eq!(config.hook_name(Operation::Update), "myapp:after_update");
}

#[tokio::test]
async fn test_deserializes_with_human_readable_interval() {
    let config: MetricsConfig =
        serde_json::from_str(r#"{"namespace":"app","scope":"svc","sample_interval":"5s"}"#)
            .unwrap();
    assert_eq!(config.namespace, "app");
    assert_eq!(config.scope, "svc");
    assert_eq!(config.sample_interval, Duration::from_secs(5));
}

#[tokio::test]
async fn test_missing_fields_fall_back_to_defaults() {
    let config: MetricsConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config.namespace, "");
    assert_eq!(config.scope, "ormetrics");
    assert_eq!(config.sample_interval, Duration::from_secs(3));
}
