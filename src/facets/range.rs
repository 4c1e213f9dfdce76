//! Range facets (`>=path` / `<=path`).
//!
//! The lower bound lives under `>=path`, the upper bound under `<=path`.
//! Display bounds (`type`, `min`, `max`) come from the first datatype of a
//! statistics aggregate over `path` under the full current query.

use super::{reset, single, single_value};
use crate::core::GraphError;
use crate::graph::Graph;
use crate::query::{Op, Param, Query, validate_path};
use crate::value::Stats;
use serde::Serialize;
use serde_json::Value as Json;

/// Current bounds of a range facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Range {
    /// Datatype of the values, if known
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    /// Least value available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Json>,
    /// Greatest value available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Json>,
    /// Selected lower bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<Json>,
    /// Selected upper bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<Json>,
}

/// Rewrites the bounds of one range facet.
#[derive(Debug, Clone)]
pub struct RangeUpdater {
    query: Query,
    lower: String,
    upper: String,
}

impl RangeUpdater {
    /// Query with both bounds replaced; `None` clears that side.
    #[must_use]
    pub fn set(&self, lower: Option<Json>, upper: Option<Json>) -> Query {
        reset(
            self.query
                .clone()
                .with(self.lower.clone(), single_value(lower))
                .with(self.upper.clone(), single_value(upper)),
        )
    }

    /// Query with both bounds removed.
    #[must_use]
    pub fn clear(&self) -> Query {
        reset(
            self.query
                .clone()
                .with(self.lower.clone(), Param::Absent)
                .with(self.upper.clone(), Param::Absent),
        )
    }
}

/// Range state for `path` of the resources at `id` under `query`.
pub fn range(
    graph: &Graph,
    id: &str,
    path: &str,
    query: &Query,
) -> Result<(Range, RangeUpdater), GraphError> {
    validate_path(path, false)?;

    let lower = Op::AtLeast.key(path);
    let upper = Op::AtMost.key(path);

    let stats = graph.stats(id, path, query).data_as::<Stats>();
    let stat = stats.stats.into_iter().next();

    let range = Range {
        datatype: stat.as_ref().map(|stat| stat.id.clone()).filter(|id| !id.is_empty()),
        min: stat.as_ref().and_then(|stat| present(&stat.min)),
        max: stat.as_ref().and_then(|stat| present(&stat.max)),
        lower: single(query.get(&lower)),
        upper: single(query.get(&upper)),
    };

    Ok((
        range,
        RangeUpdater {
            query: query.clone(),
            lower,
            upper,
        },
    ))
}

/// Model placeholders (`null`, `{}`) read as missing.
fn present(value: &Json) -> Option<Json> {
    match value {
        Json::Null => None,
        Json::Object(fields) if fields.is_empty() => None,
        value => Some(value.clone()),
    }
}
