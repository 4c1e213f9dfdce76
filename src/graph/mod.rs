//! Remote-resource graph cache.
//!
//! A [`Graph`] maps each `(id, query)` pair to exactly one [`Entry`]. The
//! pair is reduced to a canonical key (see [`canonical_key`]): the id alone
//! when the cleaned query is empty, otherwise the id followed by `?` and the
//! percent-encoded canonical JSON of the cleaned query. Because queries are
//! kept sorted, logically equal queries produce the same key regardless of
//! the order their parameters were set in.
//!
//! # Concurrency
//!
//! The key → entry map is a [`DashMap`]. All writes are insert-if-absent, so
//! an entry, once stored, is never replaced: every caller asking for the same
//! key holds the same `Arc<Entry>` until the key is evicted. Each entry starts
//! at most one fetch at a time (see [`entry`](self::entry) for the state
//! machine).
//!
//! # Examples
//!
//! ```rust,no_run
//! use facet_graph::config::GraphConfig;
//! use facet_graph::graph::Graph;
//! use facet_graph::query::Query;
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GraphConfig::load().await?;
//! let graph = Graph::http(&config)?;
//!
//! let query = Query::new().with("category", json!("roses"));
//! let entry = graph.entry("/products", &json!({ "items": [{ "id": "" }] }), &query);
//!
//! let value = entry.settle().await?;
//! println!("{value}");
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod eviction;
pub mod observer;
pub mod probe;
pub mod transport;

pub use entry::{Entry, Status};
pub use eviction::{Capacity, Eviction, Unbounded};
pub use observer::{Observer, Observers, Subscription};
pub use probe::Probe;
pub use transport::{HttpTransport, Transport, TransportError};

use crate::config::GraphConfig;
use crate::constants::{DEFAULT_LANGUAGE, LIMIT, OFFSET, ORDER, STATS, TERMS};
use crate::core::GraphError;
use crate::query::{Param, Query, Retention, canonical_key};
use crate::value::{Stats, Terms, freeze, prune};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry as Slot;
use serde_json::Value as Json;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cache of entries keyed by canonical `(id, query)` keys.
pub struct Graph {
    transport: Arc<dyn Transport>,
    entries: DashMap<String, Arc<Entry>>,
    eviction: Box<dyn Eviction>,
    retention: Retention,
    language: String,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("entries", &self.entries.len())
            .field("retention", &self.retention)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl Graph {
    /// Unbounded graph over `transport` with default settings.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            entries: DashMap::new(),
            eviction: Box::new(Unbounded),
            retention: Retention::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Graph over `transport` honouring the retention, language and eviction
    /// settings of `config`.
    pub fn with_config(transport: Arc<dyn Transport>, config: &GraphConfig) -> Self {
        let graph = Self::new(transport)
            .with_retention(config.retention)
            .with_language(&config.language);

        match config.eviction.max_entries {
            Some(max) => graph.with_eviction(Capacity::new(max)),
            None => graph,
        }
    }

    /// Graph over an [`HttpTransport`] built from `config`.
    pub fn http(config: &GraphConfig) -> Result<Self, GraphError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_config(Arc::new(transport), config))
    }

    /// Replace the eviction strategy.
    #[must_use]
    pub fn with_eviction(mut self, eviction: impl Eviction + 'static) -> Self {
        self.eviction = Box::new(eviction);
        self
    }

    /// Replace the retention policy used to clean queries.
    #[must_use]
    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// Replace the preferred display language.
    #[must_use]
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    /// Retention policy used to clean queries.
    pub fn retention(&self) -> Retention {
        self.retention
    }

    /// Preferred display language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Canonical cache key for `id` and `query`.
    pub fn key(&self, id: &str, query: &Query) -> String {
        canonical_key(id, query, self.retention)
    }

    /// The entry for `id` and `query`, created on first use.
    ///
    /// A new entry is seeded with the pruned, frozen `model`. An existing
    /// entry is returned as is: its model is whatever the first caller
    /// supplied.
    pub fn entry(&self, id: &str, model: &Json, query: &Query) -> Arc<Entry> {
        let key = self.key(id, query);

        let (entry, inserted) = match self.entries.entry(key.clone()) {
            Slot::Occupied(slot) => {
                tracing::debug!("cache hit for {}", key);
                (Arc::clone(slot.get()), false)
            }
            Slot::Vacant(slot) => {
                tracing::debug!("cache miss for {}, creating entry", key);

                let entry = Arc::new(Entry::new(
                    key.clone(),
                    freeze(prune(model)),
                    Arc::clone(&self.transport),
                ));
                slot.insert(Arc::clone(&entry));
                (entry, true)
            }
        };

        if inserted {
            for evicted in self.eviction.admit(&key) {
                if self.entries.remove(&evicted).is_some() {
                    tracing::warn!("evicted {} from the graph cache", evicted);
                }
            }
        }

        entry
    }

    /// Term counts for `path` under `query`.
    ///
    /// Ordering and pagination do not affect aggregation and are removed from
    /// the query, so every page of a result set shares one terms entry.
    pub fn terms(&self, id: &str, path: &str, query: &Query) -> Arc<Entry> {
        self.entry(id, &Terms::model(), &aggregate(query, TERMS, path))
    }

    /// Statistics for `path` under `query`; the empty path aggregates over
    /// the whole result set.
    pub fn stats(&self, id: &str, path: &str, query: &Query) -> Arc<Entry> {
        self.entry(id, &Stats::model(), &aggregate(query, STATS, path))
    }

    /// Drop the entry stored under `key`.
    ///
    /// Holders of the entry keep it; the next [`entry`](Self::entry) call for
    /// the key creates a fresh one, which is the only way to retry a failed
    /// fetch.
    pub fn evict(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.eviction.forget(key);
            tracing::debug!("evicted {} on request", key);
        }
        removed
    }

    /// Snapshot of the stored entries, in no particular order.
    pub fn entries(&self) -> Vec<Arc<Entry>> {
        self.entries.iter().map(|slot| Arc::clone(slot.value())).collect()
    }

    /// `true` if an entry is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn aggregate(query: &Query, control: &str, path: &str) -> Query {
    query
        .clone()
        .with(control, Json::String(path.to_string()))
        .with(ORDER, Param::Absent)
        .with(OFFSET, Param::Absent)
        .with(LIMIT, Param::Absent)
}
