//! Discrete option facets (`path` / `?path`).
//!
//! The option list merges two term aggregates over `path`:
//!
//! - *matching*: counts under every active constraint except this facet's own,
//!   so selecting more options of this facet does not shrink its own list
//! - *baseline*: counts under no facet constraint at all
//!
//! Matching terms come first with their live counts; baseline terms missing
//! from the matching set follow with a count of `0`. Every baseline term
//! therefore appears exactly once.

use super::{reset, single};
use crate::core::GraphError;
use crate::graph::Graph;
use crate::query::{Key, Op, Param, Query, validate_path};
use crate::value::{Terms, focus};
use serde::Serialize;
use serde_json::Value as Json;

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetOption {
    /// Term value as returned by the aggregate
    pub value: Json,
    /// Live count; `0` for options excluded by other facets
    pub count: u64,
    /// `true` if the focused value is part of the current selection
    pub selected: bool,
}

/// Rewrites the selection of one option facet.
#[derive(Debug, Clone)]
pub struct OptionsUpdater {
    query: Query,
    path: String,
    selection: Vec<Json>,
}

impl OptionsUpdater {
    /// Focused values currently selected.
    pub fn selection(&self) -> &[Json] {
        &self.selection
    }

    /// Query with `value` added to or removed from the selection.
    #[must_use]
    pub fn set(&self, value: &Json, selected: bool) -> Query {
        let value = focus(value);
        let mut selection: Vec<Json> = self.selection.iter().filter(|v| **v != value).cloned().collect();

        if selected {
            selection.push(value);
        }

        reset(
            self.query
                .clone()
                .with(self.path.clone(), Param::from(selection))
                .with(Op::Any.key(&self.path), Param::Absent),
        )
    }

    /// Query with the whole selection removed.
    #[must_use]
    pub fn clear(&self) -> Query {
        reset(
            self.query
                .clone()
                .with(self.path.clone(), Param::Absent)
                .with(Op::Any.key(&self.path), Param::Absent),
        )
    }
}

/// Options for `path` of the resources at `id` under `query`.
pub fn options(
    graph: &Graph,
    id: &str,
    path: &str,
    query: &Query,
) -> Result<(Vec<FacetOption>, OptionsUpdater), GraphError> {
    validate_path(path, false)?;

    let any = Op::Any.key(path);
    let selection = selection(query, path, &any);

    let baseline = query.filter(|key, _| Key::parse(key).is_control());
    let matching = query.without(&[path, any.as_str()]);

    let baseline = graph.terms(id, path, &baseline).data_as::<Terms>();
    let matching = graph.terms(id, path, &matching).data_as::<Terms>();

    let mut seen: Vec<Json> = Vec::new();
    let mut options = Vec::new();

    let terms = matching
        .terms
        .into_iter()
        .map(|term| (term.value, term.count))
        .chain(baseline.terms.into_iter().map(|term| (term.value, 0)));

    for (value, count) in terms {
        let focused = focus(&value);
        if seen.contains(&focused) {
            continue;
        }

        options.push(FacetOption {
            selected: selection.contains(&focused),
            value,
            count,
        });
        seen.push(focused);
    }

    Ok((
        options,
        OptionsUpdater {
            query: query.clone(),
            path: path.to_string(),
            selection,
        },
    ))
}

fn selection(query: &Query, path: &str, any: &str) -> Vec<Json> {
    let mut selection: Vec<Json> = Vec::new();

    for key in [path, any] {
        let Some(param) = query.get(key) else {
            continue;
        };

        let values: Vec<Json> = match param {
            Param::Many(_) => param.values().into_iter().map(focus).collect(),
            _ => single(Some(param)).into_iter().collect(),
        };

        for value in values {
            if !selection.contains(&value) {
                selection.push(value);
            }
        }
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    async fn settled(graph: &Graph, query: &Query) {
        graph.terms("/items", "size", query).settle().await.unwrap();
    }

    fn fixture() -> (Arc<MockTransport>, Graph) {
        let transport = Arc::new(MockTransport::new());
        let graph = Graph::new(transport.clone());

        let baseline = graph.key("/items", &Query::new().with(".terms", json!("size")));
        let matching = graph.key(
            "/items",
            &Query::new().with("color", json!("red")).with(".terms", json!("size")),
        );

        transport.respond(
            &baseline,
            json!({"terms": [
                {"value": "S", "count": 4},
                {"value": "M", "count": 3},
                {"value": "L", "count": 1}
            ]}),
        );
        transport.respond(&matching, json!({"terms": [{"value": "M", "count": 2}]}));

        (transport, graph)
    }

    #[tokio::test]
    async fn test_options_merge_matching_and_baseline() {
        let (transport, graph) = fixture();
        let query = Query::new()
            .with("color", json!("red"))
            .with("size", json!(["M"]))
            .with(".offset", json!(20));

        let (pending, _) = options(&graph, "/items", "size", &query).unwrap();
        assert!(pending.is_empty());

        settled(&graph, &Query::new()).await;
        settled(&graph, &Query::new().with("color", json!("red"))).await;

        let (options, updater) = options(&graph, "/items", "size", &query).unwrap();

        assert_eq!(
            options,
            vec![
                FacetOption { value: json!("M"), count: 2, selected: true },
                FacetOption { value: json!("S"), count: 0, selected: false },
                FacetOption { value: json!("L"), count: 0, selected: false },
            ]
        );
        assert_eq!(updater.selection(), &[json!("M")]);
        assert_eq!(transport.fetches(), 2);
    }

    #[tokio::test]
    async fn test_every_baseline_term_appears_once() {
        let (_, graph) = fixture();
        let query = Query::new().with("color", json!("red"));

        options(&graph, "/items", "size", &query).unwrap();
        settled(&graph, &Query::new()).await;
        settled(&graph, &query).await;

        let (options, _) = options(&graph, "/items", "size", &query).unwrap();
        let values: Vec<&Json> = options.iter().map(|option| &option.value).collect();

        for size in ["S", "M", "L"] {
            assert_eq!(values.iter().filter(|v| ***v == json!(size)).count(), 1);
        }
    }

    #[test]
    fn test_selection_reads_both_keys_and_focuses() {
        let query = Query::new()
            .with("category", json!([{"id": "/c/roses", "label": "Roses"}, "/c/tulips"]))
            .with("?category", json!("/c/roses"));

        assert_eq!(
            selection(&query, "category", "?category"),
            vec![json!("/c/roses"), json!("/c/tulips")]
        );
    }

    #[test]
    fn test_set_and_clear() {
        let transport = Arc::new(MockTransport::new());
        let graph = Graph::new(transport);

        let query = Query::new()
            .with("?size", json!("M"))
            .with(".offset", json!(30))
            .with("color", json!("red"));

        let (_, updater) = options(&graph, "/items", "size", &query).unwrap();

        let added = updater.set(&json!({"id": "L", "label": "Large"}), true);
        assert_eq!(added.get("size"), Some(&Param::from(json!(["M", "L"]))));
        assert_eq!(added.get("?size"), Some(&Param::Absent));
        assert_eq!(added.single(".offset"), Some(&json!(0)));
        assert_eq!(added.single("color"), Some(&json!("red")));

        let removed = updater.set(&json!("M"), false);
        assert_eq!(removed.get("size"), Some(&Param::Many(Vec::new())));

        let cleared = updater.clear();
        assert_eq!(cleared.get("size"), Some(&Param::Absent));
        assert_eq!(cleared.get("?size"), Some(&Param::Absent));
        assert_eq!(cleared.single(".offset"), Some(&json!(0)));

        assert_eq!(query.single(".offset"), Some(&json!(30)));
    }
}
