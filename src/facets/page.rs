//! Pagination (`.offset` / `.limit`).
//!
//! The total is read from a statistics aggregate over the empty path, which
//! counts the whole result set under the current query.

use super::number;
use crate::constants::{LIMIT, OFFSET};
use crate::graph::Graph;
use crate::query::Query;
use crate::value::Stats;
use serde::Serialize;
use serde_json::Value as Json;

/// Current pagination window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    /// First item shown (at least `0`)
    pub offset: u64,
    /// Page size (at least `1`)
    pub limit: u64,
    /// Total number of items
    pub count: u64,
    /// Offset of the previous page, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<u64>,
    /// Offset of the next page, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u64>,
}

/// Moves the pagination window.
#[derive(Debug, Clone)]
pub struct PageUpdater {
    query: Query,
    page: Page,
}

impl PageUpdater {
    /// Query showing the page holding `offset`.
    ///
    /// The offset is rounded down to a multiple of the limit and kept within
    /// the last page.
    #[must_use]
    pub fn set(&self, offset: i64) -> Query {
        let Page { limit, count, .. } = self.page;

        let requested = u64::try_from(offset).unwrap_or(0);
        let clamped = (requested / limit * limit).min(count / limit * limit);

        self.query.clone().with(OFFSET, Json::from(clamped))
    }
}

/// Pagination state for the resources at `id` under `query`.
pub fn page(graph: &Graph, id: &str, query: &Query) -> (Page, PageUpdater) {
    let offset = bound(number(query.single(OFFSET)), 0);
    let limit = bound(number(query.single(LIMIT)), 1);

    let count = graph.stats(id, "", query).data_as::<Stats>().count;

    let page = Page {
        offset,
        limit,
        count,
        prev: offset.checked_sub(limit),
        next: Some(offset.saturating_add(limit)).filter(|next| *next <= count),
    };

    (
        page,
        PageUpdater {
            query: query.clone(),
            page,
        },
    )
}

/// `max(floor, value)` over integers; missing values read as `0`.
fn bound(value: Option<f64>, floor: u64) -> u64 {
    let value = value.unwrap_or(0.0).floor();

    if value <= floor as f64 {
        floor
    } else if value >= u64::MAX as f64 {
        u64::MAX
    } else {
        value as u64
    }
}
