use facet_graph::facets;
use facet_graph::graph::{Graph, Status};
use facet_graph::query::{Param, Query};
use facet_graph::test_utils::MockTransport;
use serde_json::json;
use std::sync::Arc;

const CATALOGUE: &str = "/products";

async fn settle(graph: &Graph) {
    for entry in graph.entries() {
        let _ = entry.settle().await;
    }
}

/// Options list every baseline value, with live counts for matching ones.
#[tokio::test]
async fn test_options_keep_unmatched_values() {
    let transport = Arc::new(MockTransport::new());
    let graph = Graph::new(transport.clone());

    let query = Query::new()
        .with("category", json!(["roses"]))
        .with("color", json!("red"))
        .with(".limit", json!(10));

    let matching = graph.terms(CATALOGUE, "category", &Query::new().with("color", json!("red")));
    transport.respond(
        matching.key(),
        json!({"terms": [{"value": "roses", "count": 4}, {"value": "tulips", "count": 1}]}),
    );
    let baseline = graph.terms(CATALOGUE, "category", &Query::new());
    transport.respond(
        baseline.key(),
        json!({"terms": [
            {"value": "tulips", "count": 7},
            {"value": "lilies", "count": 3},
            {"value": "roses", "count": 9}
        ]}),
    );

    let (before, _) = facets::options(&graph, CATALOGUE, "category", &query).unwrap();
    assert!(before.is_empty());

    settle(&graph).await;

    let (options, updater) = facets::options(&graph, CATALOGUE, "category", &query).unwrap();
    let summary: Vec<_> = options
        .iter()
        .map(|option| (option.value.clone(), option.count, option.selected))
        .collect();

    assert_eq!(
        summary,
        vec![
            (json!("roses"), 4, true),
            (json!("tulips"), 1, false),
            (json!("lilies"), 0, false),
        ]
    );
    assert_eq!(updater.selection(), &[json!("roses")]);

    let next = updater.set(&json!("lilies"), true);
    assert_eq!(next.get("category"), Some(&Param::from(json!(["roses", "lilies"]))));
    assert_eq!(next.single(".offset"), Some(&json!(0)));
    assert_eq!(next.single(".limit"), Some(&json!(10)));
}

#[tokio::test]
async fn test_range_reads_stats_and_writes_bounds() {
    let transport = Arc::new(MockTransport::new());
    let graph = Graph::new(transport.clone());

    let stats = graph.stats(CATALOGUE, "price", &Query::new());
    transport.respond(
        stats.key(),
        json!({"stats": [{"id": "xsd:decimal", "count": 40, "min": 1.5, "max": 99}]}),
    );
    settle(&graph).await;

    let (range, updater) = facets::range(&graph, CATALOGUE, "price", &Query::new()).unwrap();

    assert_eq!(range.datatype.as_deref(), Some("xsd:decimal"));
    assert_eq!(range.min, Some(json!(1.5)));
    assert_eq!(range.max, Some(json!(99)));
    assert_eq!(range.lower, None);

    let updated = updater.set(Some(json!(10)), Some(json!(20)));
    assert_eq!(
        updated.to_json(),
        json!({">=price": 10, "<=price": 20, ".offset": 0})
    );
}

#[tokio::test]
async fn test_page_window() {
    let transport = Arc::new(MockTransport::new());
    let graph = Graph::new(transport.clone());

    let query = Query::new().with(".offset", json!(10)).with(".limit", json!(10));
    let stats = graph.stats(CATALOGUE, "", &query);
    transport.respond(stats.key(), json!({"count": 25}));
    settle(&graph).await;

    let (page, updater) = facets::page(&graph, CATALOGUE, &query);

    assert_eq!(page.offset, 10);
    assert_eq!(page.count, 25);
    assert_eq!(page.prev, Some(0));
    assert_eq!(page.next, Some(20));

    assert_eq!(updater.set(15).single(".offset"), Some(&json!(10)));
    assert_eq!(updater.set(99).single(".offset"), Some(&json!(20)));
    assert_eq!(updater.set(-3).single(".offset"), Some(&json!(0)));
}

#[test]
fn test_keywords_and_order() {
    let query = Query::new()
        .with("~label", json!("  red   rose "))
        .with(".order", json!(["-price", "label"]))
        .with(".offset", json!(30));

    let (keywords, updater) = facets::keywords("label", &query).unwrap();
    assert_eq!(keywords, "red rose");
    assert_eq!(updater.set("   ").get("~label"), Some(&Param::Absent));
    assert_eq!(updater.set("tulip").single(".offset"), Some(&json!(30)));

    let (ascending, updater) = facets::order("price", &query).unwrap();
    assert_eq!(ascending, Some(false));

    let flipped = updater.set(Some(true));
    assert_eq!(flipped.single(".order"), Some(&json!("+price")));
    assert_eq!(flipped.single(".offset"), Some(&json!(0)));

    assert!(facets::order(".price", &query).is_err());
}

/// Deriving outside a runtime leaves aggregates fetchable later.
#[test]
fn test_page_derived_outside_runtime() {
    let transport = Arc::new(MockTransport::new());
    let graph = Graph::new(transport.clone());

    let stats = graph.stats(CATALOGUE, "", &Query::new());
    transport.respond(stats.key(), json!({"count": 12}));

    let (page, _) = facets::page(&graph, CATALOGUE, &Query::new());
    assert_eq!(page.count, 0);
    assert_eq!(stats.state(), Status::Unresolved);
    assert_eq!(transport.fetches(), 0);

    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(stats.settle()).unwrap();

    let (page, _) = facets::page(&graph, CATALOGUE, &Query::new());
    assert_eq!(page.count, 12);
    assert_eq!(stats.state(), Status::Resolved);
}

/// Servers sending float counts or null ids still produce options.
#[tokio::test]
async fn test_options_from_loosely_typed_terms() {
    let transport = Arc::new(MockTransport::new());
    let graph = Graph::new(transport.clone());

    let terms = graph.terms(CATALOGUE, "size", &Query::new());
    transport.respond(
        terms.key(),
        json!({"id": null, "terms": [{"value": "M", "count": 3.0}, {"value": "L", "count": null}]}),
    );
    settle(&graph).await;

    let (options, _) = facets::options(&graph, CATALOGUE, "size", &Query::new()).unwrap();
    let counts: Vec<_> = options
        .iter()
        .map(|option| (option.value.clone(), option.count))
        .collect();

    assert_eq!(counts, vec![(json!("M"), 3), (json!("L"), 0)]);
}
