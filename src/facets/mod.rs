//! Facet derivation.
//!
//! Each facet function projects the current [`Query`] (and, where counts or
//! bounds are needed, the [`Graph`](crate::graph::Graph)) onto a
//! `(state, updater)` pair. Updaters never mutate the query they were derived
//! from: every update returns a new query, ready to be handed back to the
//! caller that owns the query state.
//!
//! | Facet                    | Keys read                     | State                |
//! |--------------------------|-------------------------------|----------------------|
//! | [`keywords`]             | `~path`                       | `String`             |
//! | [`options`]              | `path`, `?path`               | `Vec<FacetOption>`   |
//! | [`range`](range())       | `>=path`, `<=path`            | [`Range`]            |
//! | [`order`]                | `.order`                      | `Option<bool>`       |
//! | [`page`]                 | `.offset`, `.limit`           | [`Page`]             |
//!
//! Facets backed by aggregates ([`options`], [`range`](range()), [`page`])
//! start the fetches they need and report the empty model until those
//! resolve; observe the entries returned by
//! [`Graph::terms`](crate::graph::Graph::terms) and
//! [`Graph::stats`](crate::graph::Graph::stats) to re-derive on completion.
//!
//! Every update except keyword edits resets `.offset` to `0`.

pub mod keywords;
pub mod options;
pub mod order;
pub mod page;
pub mod range;

pub use keywords::{KeywordsUpdater, keywords, keywords_in};
pub use options::{FacetOption, OptionsUpdater, options};
pub use order::{OrderUpdater, order};
pub use page::{Page, PageUpdater, page};
pub use range::{Range, RangeUpdater, range};

use crate::constants::OFFSET;
use crate::query::{Param, Query};
use crate::value::focus;
use serde_json::Value as Json;

/// Focused single value of a parameter; sequences and absent values yield
/// `None`.
fn single(param: Option<&Param>) -> Option<Json> {
    param.and_then(Param::single).map(focus)
}

/// Focused form of an optional value for writing back; sequences are dropped.
fn single_value(value: Option<Json>) -> Param {
    match value {
        None | Some(Json::Array(_)) => Param::Absent,
        Some(value) => Param::from(focus(&value)),
    }
}

/// Numeric reading of a query value; numeric strings (as read from a URL
/// search string) count.
fn number(value: Option<&Json>) -> Option<f64> {
    let n = match value? {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    n.filter(|n| n.is_finite())
}

fn reset(query: Query) -> Query {
    query.with(OFFSET, Json::from(0))
}
