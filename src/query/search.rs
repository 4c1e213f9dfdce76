//! URL search-string codec for queries.
//!
//! Keeps a [`Query`] in sync with a page address without touching browser
//! history: [`parse_search`] reads `a=1&a=2&~label=rose`, repeating keys into
//! sequences, and [`to_search`] renders a query back, omitting parameters equal
//! to their defaults and falsy control values.
//!
//! All values read from a search string are strings.

use super::{Key, Param, Query, truthy};
use serde_json::Value as Json;
use url::form_urlencoded;

/// Parse a search string (with or without the leading `?`).
pub fn parse_search(search: &str) -> Query {
    let search = search.strip_prefix('?').unwrap_or(search);
    let mut query = Query::new();

    for (key, value) in form_urlencoded::parse(search.as_bytes()) {
        let value = Param::One(Json::String(value.into_owned()));

        let param = match query.remove(&key) {
            None => value,
            Some(Param::Many(mut members)) => {
                members.push(value);
                Param::Many(members)
            }
            Some(current) => Param::Many(vec![current, value]),
        };

        query.insert(key.into_owned(), param);
    }

    query
}

/// Render a query as a search string, without the leading `?`.
///
/// Parameters equal to the binding in `defaults` are skipped, as are control
/// parameters with a falsy value (an offset of `0`, for instance).
pub fn to_search(query: &Query, defaults: Option<&Query>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    for (key, param) in query.iter() {
        if defaults.and_then(|defaults| defaults.get(key)) == Some(param) {
            continue;
        }

        let control = Key::parse(key).is_control();

        for value in param.values() {
            if control && !truthy(value) {
                continue;
            }

            serializer.append_pair(key, &render(value));
        }
    }

    serializer.finish()
}

fn render(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_search_repeats_into_sequences() {
        let query = parse_search("?category=roses&category=tulips&category=lilies&%7Elabel=wild+rose");

        assert_eq!(query.get("category"), Some(&Param::from(json!(["roses", "tulips", "lilies"]))));
        assert_eq!(query.single("~label"), Some(&json!("wild rose")));
    }

    #[test]
    fn test_parse_empty_search() {
        assert!(parse_search("").is_empty());
        assert!(parse_search("?").is_empty());
    }

    #[test]
    fn test_to_search() {
        let query = Query::new()
            .with("category", json!(["roses", "tulips"]))
            .with(">=price", json!(10))
            .with(".offset", json!(0))
            .with(".limit", json!(20))
            .with("gone", Param::Absent);

        assert_eq!(
            to_search(&query, None),
            ".limit=20&%3E%3Dprice=10&category=roses&category=tulips"
        );
    }

    #[test]
    fn test_to_search_skips_defaults() {
        let defaults = Query::new().with(".limit", json!(20));
        let query = Query::new().with(".limit", json!(20)).with("~label", json!("rose"));

        assert_eq!(to_search(&query, Some(&defaults)), "%7Elabel=rose");
    }

    #[test]
    fn test_search_round_trip_of_strings() {
        let query = Query::new()
            .with("category", json!(["a b", "c&d"]))
            .with("~label", json!("x=y"));

        assert_eq!(parse_search(&to_search(&query, None)), query);
    }
}
