//! facet-graph - query-keyed resource cache and facet derivation
//!
//! A client-side data layer for faceted search over JSON resources. It caches
//! fetched resource representations keyed by identity *and* query, exposes a
//! small observable state machine per cached entry, and derives UI-facing facet
//! state (selectable options, value ranges, sort order, pagination) from a
//! declarative query by running differential aggregate queries against the
//! same cache.
//!
//! # Architecture Overview
//!
//! Modules build on each other in this order:
//!
//! 1. [`value`] - classification of JSON values (primitives, multilingual
//!    text, blank and identified resources), labels, request models
//! 2. [`query`] - queries, the `clean()` normalizer, canonical cache keys and
//!    the URL search-string codec
//! 3. [`graph::Entry`] - one cached fetch: `Unresolved → Pending →
//!    Resolved | Failed`, with observers and probe-style reads
//! 4. [`graph::Graph`] - maps `(id, query)` to exactly one entry; at most one
//!    fetch in flight per key; pluggable eviction
//! 5. [`facets`] - keyword, option, range, order and page facets as
//!    `(state, updater)` pairs
//!
//! ## Supporting Modules
//! - [`cli`] - Command-line interface
//! - [`config`] - TOML configuration (`~/.facet-graph/config.toml`)
//! - [`constants`] - Query vocabulary and defaults
//! - [`core`] - Error types and user-friendly error rendering
//!
//! # Query Keys
//!
//! | Key          | Meaning                                      |
//! |--------------|----------------------------------------------|
//! | `path`       | Equality / inclusion filter                  |
//! | `?path`      | Alternate inclusion marker (option toggling) |
//! | `~path`      | Keyword filter                               |
//! | `>=path`     | Lower range bound                            |
//! | `<=path`     | Upper range bound                            |
//! | `.terms`     | Term-count aggregate over a path             |
//! | `.stats`     | Statistics aggregate over a path             |
//! | `.order`     | Sort criteria (`path`, `+path`, `-path`)     |
//! | `.offset`    | Pagination offset                            |
//! | `.limit`     | Page size                                    |
//!
//! # Example
//!
//! ```rust,no_run
//! use facet_graph::config::GraphConfig;
//! use facet_graph::facets;
//! use facet_graph::graph::Graph;
//! use facet_graph::query::Query;
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let graph = Graph::http(&GraphConfig::load().await?)?;
//! let query = Query::new().with("category", json!(["roses"]));
//!
//! // Starts the aggregate fetches; options fill in as they resolve
//! let (options, updater) = facets::options(&graph, "/products", "category", &query)?;
//! for option in &options {
//!     println!("{} ({})", option.value, option.count);
//! }
//!
//! // Updaters return new queries
//! let next = updater.set(&json!("tulips"), true);
//! # let _ = next;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod facets;
pub mod graph;
pub mod query;
pub mod value;

// test_utils is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
