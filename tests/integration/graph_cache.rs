use facet_graph::graph::{Capacity, Graph, Status, TransportError};
use facet_graph::query::Query;
use facet_graph::test_utils::{MockTransport, init_test_logging};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn graph() -> (Arc<MockTransport>, Graph) {
    init_test_logging(None);

    let transport = Arc::new(MockTransport::new());
    let graph = Graph::new(transport.clone());
    (transport, graph)
}

fn catalogue_model() -> serde_json::Value {
    json!({
        "id": "",
        "label": "",
        "items": [{ "id": "", "label": "" }]
    })
}

/// Logically equal queries built in different orders share one entry.
#[tokio::test]
async fn test_entry_identity_across_insertion_orders() {
    let (transport, graph) = graph();

    let a = Query::new()
        .with("category", json!(["roses", "tulips"]))
        .with("color", json!("red"))
        .with(".limit", json!(10))
        .with("size", json!(null));
    let b = Query::new()
        .with(".limit", json!(10))
        .with("color", json!("red"))
        .with("category", json!(["roses", "tulips"]));

    let key = graph.key("/products", &a);
    assert_eq!(key, graph.key("/products", &b));

    transport.respond(&key, json!({"label": "Products"}));

    let first = graph.entry("/products", &catalogue_model(), &a);
    let second = graph.entry("/products", &catalogue_model(), &b);
    assert!(Arc::ptr_eq(&first, &second));

    let value = second.settle().await.unwrap();
    assert_eq!(value["label"], "Products");
    assert_eq!(value["items"], json!([]));
    assert_eq!(transport.fetches(), 1);
}

/// Many readers of a pending entry trigger one fetch.
#[tokio::test]
async fn test_at_most_one_fetch_in_flight() {
    let (transport, graph) = graph();
    transport.respond("/products", json!({"label": "Products"}));
    let gate = transport.hold();

    let readers: Vec<_> = (0..8)
        .map(|_| graph.entry("/products", &catalogue_model(), &Query::new()))
        .collect();

    for reader in &readers {
        reader.get();
        assert_eq!(reader.state(), Status::Pending);
    }

    let waits = readers.iter().map(|reader| {
        let reader = Arc::clone(reader);
        tokio::spawn(async move { reader.settle().await })
    });
    let waits: Vec<_> = waits.collect();

    gate.release();

    for wait in waits {
        let value = wait.await.unwrap().unwrap();
        assert_eq!(value["label"], "Products");
    }
    assert_eq!(transport.fetch_count("/products"), 1);
}

/// Failed keys stay failed until evicted; resolved keys never refetch.
#[tokio::test]
async fn test_terminal_states_and_retry_by_eviction() {
    let (transport, graph) = graph();
    transport.fail(
        "/products",
        TransportError::Status {
            url: "/products".to_string(),
            status: 503,
        },
    );

    let failed = graph.entry("/products", &catalogue_model(), &Query::new());
    assert!(failed.settle().await.is_err());
    assert_eq!(failed.state(), Status::Failed);

    let again = graph.entry("/products", &catalogue_model(), &Query::new());
    assert!(Arc::ptr_eq(&failed, &again));
    again.get();
    assert_eq!(transport.fetch_count("/products"), 1);

    transport.respond("/products", json!({"label": "Products"}));
    assert!(graph.evict("/products"));

    let retried = graph.entry("/products", &catalogue_model(), &Query::new());
    retried.settle().await.unwrap();
    retried.get();

    assert_eq!(retried.state(), Status::Resolved);
    assert_eq!(failed.state(), Status::Failed);
    assert_eq!(transport.fetch_count("/products"), 2);
}

/// Observers hear every transition; holders outlive capacity eviction.
#[tokio::test]
async fn test_observers_and_capacity_eviction() {
    let transport = Arc::new(MockTransport::new());
    let graph = Graph::new(transport.clone()).with_eviction(Capacity::new(2));
    transport.respond("/a", json!({"label": "A"}));

    let entry = graph.entry("/a", &json!({"label": ""}), &Query::new());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let _subscription = entry.observe(move |entry| log.lock().unwrap().push(entry.state()));

    entry.settle().await.unwrap();
    entry.patch(json!({"label": "A*"})).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![Status::Pending, Status::Resolved, Status::Resolved]
    );

    graph.entry("/b", &json!({}), &Query::new());
    graph.entry("/c", &json!({}), &Query::new());

    assert_eq!(graph.len(), 2);
    assert!(!graph.contains("/a"));
    assert_eq!(entry.value().unwrap()["label"], "A*");
}

/// A cancelled fetch can be restarted; the stale completion is dropped.
#[tokio::test]
async fn test_cancel_and_restart() {
    let (transport, graph) = graph();
    transport.respond("/slow", json!({"label": "Slow"}));
    let gate = transport.hold();

    let entry = graph.entry("/slow", &json!({"label": ""}), &Query::new());
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notified);
    let _subscription = entry.observe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    entry.get();
    assert!(entry.cancel());
    assert_eq!(entry.state(), Status::Unresolved);
    assert_eq!(entry.data(|json| json["label"].clone()), json!(""));

    gate.release();
    let value = entry.settle().await.unwrap();

    assert_eq!(value["label"], "Slow");
    assert_eq!(transport.fetch_count("/slow"), 2);
    // pending, unresolved, pending (data), resolved
    assert_eq!(notified.load(Ordering::SeqCst), 4);
}
