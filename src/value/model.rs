//! Request models and the helpers that shape fetched data onto them.
//!
//! A *model* is a template describing the shape expected in a response. The
//! cache prunes the model ([`prune`]) to an empty baseline, freezes it, and
//! merges every fetched document onto it ([`merge`]) so consumers can rely on
//! the model's fields being present even when the server omits them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as Json, json};
use std::sync::Arc;

/// Immutable, shareable JSON document.
///
/// Nothing reachable from a `Frozen` can be mutated: the only access is
/// through `&Json`, and updates always build a new document.
pub type Frozen = Arc<Json>;

/// Freeze a document for sharing.
#[must_use]
pub fn freeze(value: Json) -> Frozen {
    Arc::new(value)
}

/// Build an empty baseline with the same shape as `model`.
///
/// Every array becomes empty and every object is pruned recursively;
/// scalars are kept as defaults.
#[must_use]
pub fn prune(model: &Json) -> Json {
    match model {
        Json::Array(_) => Json::Array(Vec::new()),
        Json::Object(fields) => Json::Object(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), prune(value)))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// Overlay `fields` onto `base`.
///
/// Top-level fields of `fields` win on conflict; `base` supplies the fields
/// that `fields` omits. A non-object `base` contributes nothing.
#[must_use]
pub fn merge(base: &Json, fields: Map<String, Json>) -> Json {
    let mut merged = base.as_object().cloned().unwrap_or_default();
    merged.extend(fields);
    Json::Object(merged)
}

/// A single term count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// The term value (primitive, multilingual text or resource)
    #[serde(default)]
    pub value: Json,
    /// Number of matching resources
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
}

/// Term counts for a path, as returned for `.terms` queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Terms {
    /// Id of the aggregated container
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    /// Term counts
    #[serde(default, deserialize_with = "nullable")]
    pub terms: Vec<Term>,
}

impl Terms {
    /// Request model for `.terms` queries.
    #[must_use]
    pub fn model() -> Json {
        json!({
            "id": "",
            "terms": [{ "value": {}, "count": 0 }]
        })
    }
}

/// Statistics for a single datatype.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    /// Datatype id
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    /// Number of values of this datatype
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
    /// Least value
    #[serde(default)]
    pub min: Json,
    /// Greatest value
    #[serde(default)]
    pub max: Json,
}

/// Statistics for a path, as returned for `.stats` queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Id of the aggregated container
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    /// Total number of matching resources
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
    /// Least value overall
    #[serde(default)]
    pub min: Json,
    /// Greatest value overall
    #[serde(default)]
    pub max: Json,
    /// Per-datatype breakdown
    #[serde(default, deserialize_with = "nullable")]
    pub stats: Vec<Stat>,
}

impl Stats {
    /// Request model for `.stats` queries.
    #[must_use]
    pub fn model() -> Json {
        json!({
            "id": "",
            "count": 0,
            "min": {},
            "max": {},
            "stats": [{ "id": "", "count": 0, "min": {}, "max": {} }]
        })
    }
}

/// `null` reads as the default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Counts arrive as integers, whole floats (`3.0`) or numeric strings;
/// `null` reads as `0`.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let json = Json::deserialize(deserializer)?;

    let count = match &json {
        Json::Null => Some(0.0),
        Json::Number(n) => n.as_f64(),
        Json::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match count {
        Some(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 => Ok(n as u64),
        _ => Err(serde::de::Error::custom(format!("invalid count: {json}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_empties_arrays() {
        let pruned = prune(&json!({
            "id": "",
            "terms": [{ "value": {}, "count": 0 }],
            "nested": { "items": [1, 2, 3], "name": "x" }
        }));

        assert_eq!(
            pruned,
            json!({ "id": "", "terms": [], "nested": { "items": [], "name": "x" } })
        );
    }

    #[test]
    fn test_prune_scalars_pass_through() {
        assert_eq!(prune(&json!(3)), json!(3));
        assert_eq!(prune(&json!([1])), json!([]));
    }

    #[test]
    fn test_merge_response_wins() {
        let base = json!({ "id": "", "count": 0, "terms": [] });
        let response = json!({ "id": "/items", "terms": [{ "value": "a", "count": 1 }] });

        let merged = merge(&base, response.as_object().cloned().unwrap());
        assert_eq!(
            merged,
            json!({ "id": "/items", "count": 0, "terms": [{ "value": "a", "count": 1 }] })
        );
    }

    #[test]
    fn test_freeze_shares_document() {
        let frozen = freeze(json!({ "a": 1 }));
        let alias = Frozen::clone(&frozen);
        assert!(Arc::ptr_eq(&frozen, &alias));
        assert_eq!(alias["a"], 1);
    }

    #[test]
    fn test_lenient_aggregate_shapes() {
        let terms: Terms = serde_json::from_value(json!({
            "id": null,
            "terms": [
                { "value": "roses", "count": 3.0 },
                { "value": "tulips", "count": "2" },
                { "value": "lilies", "count": null }
            ]
        }))
        .unwrap();

        assert_eq!(terms.id, "");
        let counts: Vec<u64> = terms.terms.iter().map(|term| term.count).collect();
        assert_eq!(counts, vec![3, 2, 0]);

        let stats: Stats = serde_json::from_value(json!({
            "id": "/items", "count": 25.0, "stats": null
        }))
        .unwrap();
        assert_eq!(stats.count, 25);
        assert!(stats.stats.is_empty());
    }

    #[test]
    fn test_invalid_counts_are_rejected() {
        for count in [json!(-1), json!(2.5), json!("many"), json!([1])] {
            let result = serde_json::from_value::<Stats>(json!({ "count": count }));
            assert!(result.is_err(), "{count} should not read as a count");
        }
    }

    #[test]
    fn test_pruned_models_deserialize() {
        let terms: Terms = serde_json::from_value(prune(&Terms::model())).unwrap();
        assert!(terms.terms.is_empty());

        let stats: Stats = serde_json::from_value(prune(&Stats::model())).unwrap();
        assert_eq!(stats.count, 0);
        assert!(stats.stats.is_empty());
    }
}
