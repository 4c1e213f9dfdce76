use facet_graph::config::GraphConfig;
use facet_graph::graph::{Graph, HttpTransport};
use facet_graph::query::{Query, Retention};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_saved_config_drives_graph() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("config.toml");

    let mut config = GraphConfig::default();
    config.base = Some("https://example.org/api/".to_string());
    config.retention = Retention::Truthy;
    config.eviction.max_entries = Some(1);
    config.save_to(&path).await.unwrap();

    let loaded = GraphConfig::load_with_optional(Some(path)).await.unwrap();
    assert_eq!(loaded, config);

    let transport = HttpTransport::new(&loaded).unwrap();
    let graph = Graph::with_config(Arc::new(transport), &loaded);

    let query = Query::new().with("color", json!("")).with("size", json!(0));
    assert_eq!(graph.key("/products", &query), "/products");

    graph.entry("/a", &json!({}), &Query::new());
    graph.entry("/b", &json!({}), &Query::new());
    assert_eq!(graph.len(), 1);
}

#[tokio::test]
async fn test_missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let config = GraphConfig::load_with_optional(Some(temp.path().join("absent.toml")))
        .await
        .unwrap();

    assert_eq!(config, GraphConfig::default());
}

#[tokio::test]
async fn test_invalid_files_are_rejected() {
    let temp = TempDir::new().unwrap();

    let malformed = temp.path().join("malformed.toml");
    tokio::fs::write(&malformed, "retention = [").await.unwrap();
    assert!(GraphConfig::load_from(&malformed).await.is_err());

    let unknown_policy = temp.path().join("policy.toml");
    tokio::fs::write(&unknown_policy, "retention = \"sometimes\"\n").await.unwrap();
    assert!(GraphConfig::load_from(&unknown_policy).await.is_err());

    let zero_capacity = temp.path().join("capacity.toml");
    tokio::fs::write(&zero_capacity, "[eviction]\nmax_entries = 0\n").await.unwrap();
    let error = GraphConfig::load_from(&zero_capacity).await.unwrap_err();
    assert!(format!("{error:#}").contains("max_entries"));
}
