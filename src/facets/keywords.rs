//! Keyword filters (`~path`).

use super::single;
use crate::constants::DEFAULT_LANGUAGE;
use crate::core::GraphError;
use crate::query::{Op, Param, Query, validate_path};
use crate::value::{display_string, normalize};
use serde_json::Value as Json;

/// Rewrites the keyword filter of one path.
#[derive(Debug, Clone)]
pub struct KeywordsUpdater {
    query: Query,
    key: String,
}

impl KeywordsUpdater {
    /// Query with the filter set to the normalized `text`; blank text clears
    /// the filter.
    #[must_use]
    pub fn set(&self, text: &str) -> Query {
        let keywords = normalize(text);

        let param = if keywords.is_empty() {
            Param::Absent
        } else {
            Param::One(Json::String(keywords))
        };

        self.query.clone().with(self.key.clone(), param)
    }
}

/// Current keywords for `path`, normalized.
pub fn keywords(path: &str, query: &Query) -> Result<(String, KeywordsUpdater), GraphError> {
    keywords_in(path, query, DEFAULT_LANGUAGE)
}

/// [`keywords`], reading multilingual filter text in `language`.
pub fn keywords_in(
    path: &str,
    query: &Query,
    language: &str,
) -> Result<(String, KeywordsUpdater), GraphError> {
    validate_path(path, false)?;

    let key = Op::Like.key(path);
    let current = single(query.get(&key));
    let keywords = normalize(&display_string(current.as_ref(), language));

    Ok((
        keywords,
        KeywordsUpdater {
            query: query.clone(),
            key,
        },
    ))
}
