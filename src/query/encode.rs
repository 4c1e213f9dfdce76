//! Canonical cache keys.
//!
//! Key format:
//!
//! ```text
//! {id}                               when the cleaned query is empty
//! {id}?{percent-encoded JSON}        otherwise
//! ```
//!
//! The JSON text is produced with object members sorted at every depth, so
//! logically equal queries always yield the same key.

use super::{Query, Retention, clean_with};
use serde_json::{Map, Value as Json};

/// Canonical key for `id` and `query` under the given retention policy.
pub fn canonical_key(id: &str, query: &Query, retention: Retention) -> String {
    let cleaned = clean_with(query, retention);

    if cleaned.is_empty() {
        return id.to_string();
    }

    let json = canonical(&cleaned.to_json());
    format!("{id}?{}", urlencoding::encode(&json.to_string()))
}

fn canonical(json: &Json) -> Json {
    match json {
        Json::Object(members) => {
            let mut sorted: Vec<(&String, &Json)> = members.iter().collect();
            sorted.sort_by(|(a, _), (b, _)| a.cmp(b));

            Json::Object(
                sorted
                    .into_iter()
                    .map(|(key, value)| (key.clone(), canonical(value)))
                    .collect::<Map<_, _>>(),
            )
        }
        Json::Array(members) => Json::Array(members.iter().map(canonical).collect()),
        scalar => scalar.clone(),
    }
}
