//! Sort order (`.order`).
//!
//! `.order` holds one criterion or a sequence of them. A criterion is a path,
//! optionally prefixed with `+` (ascending, the default) or `-` (descending).
//! Updates always write a single criterion; composing several sort keys is
//! left to callers editing `.order` directly.

use super::reset;
use crate::constants::ORDER;
use crate::core::GraphError;
use crate::query::{Param, Query, validate_path};
use serde_json::Value as Json;

/// Rewrites the sort order on one path.
#[derive(Debug, Clone)]
pub struct OrderUpdater {
    query: Query,
    path: String,
}

impl OrderUpdater {
    /// Query sorting on this path, ascending for `Some(true)`, descending for
    /// `Some(false)`; `None` drops the sort order entirely.
    #[must_use]
    pub fn set(&self, ascending: Option<bool>) -> Query {
        let order = match ascending {
            Some(true) => Param::One(Json::String(format!("+{}", self.path))),
            Some(false) => Param::One(Json::String(format!("-{}", self.path))),
            None => Param::Absent,
        };

        reset(self.query.clone().with(ORDER, order))
    }
}

/// Current sort direction on `path`: `Some(true)` ascending, `Some(false)`
/// descending, `None` when `path` is not a criterion.
///
/// The first criterion naming `path` decides.
pub fn order(path: &str, query: &Query) -> Result<(Option<bool>, OrderUpdater), GraphError> {
    validate_path(path, false)?;

    let direction = query
        .get(ORDER)
        .map(Param::values)
        .unwrap_or_default()
        .into_iter()
        .filter_map(Json::as_str)
        .find_map(|criterion| direction(criterion, path));

    Ok((
        direction,
        OrderUpdater {
            query: query.clone(),
            path: path.to_string(),
        },
    ))
}

fn direction(criterion: &str, path: &str) -> Option<bool> {
    if let Some(rest) = criterion.strip_prefix('-') {
        return (rest == path).then_some(false);
    }

    let rest = criterion.strip_prefix('+').unwrap_or(criterion);
    (rest == path).then_some(true)
}
