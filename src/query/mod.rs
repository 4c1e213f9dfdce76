//! Declarative query objects.
//!
//! A [`Query`] maps *parameter keys* to [`Param`]s. Keys are either:
//!
//! - **control keys**, prefixed with `.`: `.terms`, `.stats`, `.order`,
//!   `.offset`, `.limit`
//! - **facet keys**: a bare property path (equality/inclusion filter) or an
//!   operator-prefixed path: `~path` (keywords), `>=path` / `<=path` (range
//!   bounds), `?path` (alternate inclusion marker)
//!
//! Queries are backed by a sorted map: two queries holding the same
//! parameters are equal, and encode to the same cache key, no matter in which
//! order the parameters were inserted.
//!
//! Absence is explicit. [`Param::Absent`] plays the role of an `undefined`
//! member: setting a key to `Absent` marks it for removal by [`clean`] without
//! relying on falsy coercion of real values.
//!
//! # Examples
//!
//! ```rust
//! use facet_graph::query::{Param, Query, clean};
//! use serde_json::json;
//!
//! let query = Query::new()
//!     .with("category", json!(["roses", "tulips"]))
//!     .with("~label", json!("wild"))
//!     .with(".offset", json!(0))
//!     .with("color", Param::Absent);
//!
//! let cleaned = clean(&query);
//! assert!(cleaned.get("color").is_none());
//! assert_eq!(cleaned.len(), 3);
//! ```

pub mod clean;
pub mod encode;
pub mod search;

pub use clean::{Retention, clean, clean_with};
pub use encode::canonical_key;
pub use search::{parse_search, to_search};

use crate::constants::{ANY, AT_LEAST, AT_MOST, CONTROL_PREFIX, LIKE};
use crate::core::GraphError;
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;

/// Value bound to a query key.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Param {
    /// No value; dropped by [`clean`]
    #[default]
    Absent,
    /// A single value
    One(Json),
    /// A sequence of values, possibly nested, possibly with absent members
    Many(Vec<Param>),
}

impl Param {
    /// `true` for [`Param::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The value, if this is a single value.
    pub fn single(&self) -> Option<&Json> {
        match self {
            Self::One(value) => Some(value),
            _ => None,
        }
    }

    /// Every present value, flattening nested sequences.
    pub fn values(&self) -> Vec<&Json> {
        match self {
            Self::Absent => Vec::new(),
            Self::One(value) => vec![value],
            Self::Many(members) => members.iter().flat_map(Param::values).collect(),
        }
    }

    /// JSON form; absent members of sequences are skipped and a top-level
    /// absent value becomes `null`.
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Self::Absent => Json::Null,
            Self::One(value) => value.clone(),
            Self::Many(members) => Json::Array(
                members
                    .iter()
                    .filter(|member| !member.is_absent())
                    .map(Param::to_json)
                    .collect(),
            ),
        }
    }
}

impl From<Json> for Param {
    fn from(value: Json) -> Self {
        match value {
            Json::Null => Self::Absent,
            Json::Array(members) => Self::Many(members.into_iter().map(Self::from).collect()),
            value => Self::One(value),
        }
    }
}

impl From<Option<Json>> for Param {
    fn from(value: Option<Json>) -> Self {
        value.map_or(Self::Absent, Self::from)
    }
}

/// JavaScript-style truthiness of a JSON value.
pub(crate) fn truthy(value: &Json) -> bool {
    match value {
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Json::String(s) => !s.is_empty(),
        Json::Array(_) | Json::Object(_) => true,
    }
}

impl From<Vec<Json>> for Param {
    fn from(values: Vec<Json>) -> Self {
        Self::Many(values.into_iter().map(Self::from).collect())
    }
}

/// Facet operator carried by a key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Bare path: equality/inclusion filter
    Equal,
    /// `~path`: keyword filter
    Like,
    /// `>=path`: lower bound
    AtLeast,
    /// `<=path`: upper bound
    AtMost,
    /// `?path`: alternate inclusion marker
    Any,
}

impl Op {
    /// Key prefix for this operator.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Equal => "",
            Self::Like => LIKE,
            Self::AtLeast => AT_LEAST,
            Self::AtMost => AT_MOST,
            Self::Any => ANY,
        }
    }

    /// Build the key applying this operator to `path`.
    pub fn key(self, path: &str) -> String {
        format!("{}{path}", self.prefix())
    }
}

/// Classified parameter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    /// `.name` control key; carries the full key
    Control(&'a str),
    /// Facet key with its operator and bare path
    Facet {
        /// Operator from the key prefix
        op: Op,
        /// Property path without the prefix
        path: &'a str,
    },
}

impl<'a> Key<'a> {
    /// Classify a raw key.
    pub fn parse(key: &'a str) -> Self {
        if key.starts_with(CONTROL_PREFIX) {
            return Self::Control(key);
        }

        for op in [Op::AtLeast, Op::AtMost, Op::Like, Op::Any] {
            if let Some(path) = key.strip_prefix(op.prefix()) {
                return Self::Facet { op, path };
            }
        }

        Self::Facet {
            op: Op::Equal,
            path: key,
        }
    }

    /// `true` for control keys.
    pub fn is_control(&self) -> bool {
        matches!(self, Self::Control(_))
    }
}

/// Check that `path` is a bare, non-empty property path.
///
/// The empty path is accepted only where `allow_empty` is set: statistics over
/// the empty path report the size of the whole result set.
pub fn validate_path(path: &str, allow_empty: bool) -> Result<(), GraphError> {
    let bare = matches!(Key::parse(path), Key::Facet { op: Op::Equal, .. });

    if bare && (allow_empty || !path.is_empty()) {
        Ok(())
    } else {
        Err(GraphError::InvalidPath {
            path: path.to_string(),
        })
    }
}

/// Ordered mapping from parameter keys to parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    params: BTreeMap<String, Param>,
}

impl Query {
    /// Empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object; `null` members become [`Param::Absent`].
    pub fn from_json(json: &Json) -> Result<Self, GraphError> {
        match json {
            Json::Object(members) => Ok(members
                .iter()
                .map(|(key, value)| (key.clone(), Param::from(value.clone())))
                .collect()),
            Json::Null => Ok(Self::new()),
            other => Err(GraphError::InvalidQuery {
                reason: format!("expected a JSON object, found {other}"),
            }),
        }
    }

    /// JSON object form; absent parameters are rendered as `null`.
    #[must_use]
    pub fn to_json(&self) -> Json {
        Json::Object(
            self.params
                .iter()
                .map(|(key, param)| (key.clone(), param.to_json()))
                .collect::<Map<_, _>>(),
        )
    }

    /// Copy of this query with `key` bound to `param`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, param: impl Into<Param>) -> Self {
        self.params.insert(key.into(), param.into());
        self
    }

    /// Copy of this query without the given keys.
    #[must_use]
    pub fn without(&self, keys: &[&str]) -> Self {
        self.params
            .iter()
            .filter(|(key, _)| !keys.contains(&key.as_str()))
            .map(|(key, param)| (key.clone(), param.clone()))
            .collect()
    }

    /// Copy of this query keeping only the entries accepted by `keep`.
    #[must_use]
    pub fn filter(&self, mut keep: impl FnMut(&str, &Param) -> bool) -> Self {
        self.params
            .iter()
            .filter(|(key, param)| keep(key, param))
            .map(|(key, param)| (key.clone(), param.clone()))
            .collect()
    }

    /// Bind `key` to `param` in place.
    pub fn insert(&mut self, key: impl Into<String>, param: impl Into<Param>) {
        self.params.insert(key.into(), param.into());
    }

    /// Remove `key` in place.
    pub fn remove(&mut self, key: &str) -> Option<Param> {
        self.params.remove(key)
    }

    /// Parameter bound to `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Param> {
        self.params.get(key)
    }

    /// Single value bound to `key`; absent keys and sequences yield `None`.
    pub fn single(&self, key: &str) -> Option<&Json> {
        self.get(key).and_then(Param::single)
    }

    /// `true` if `key` is bound, even to [`Param::Absent`].
    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over keys and parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.params.iter().map(|(key, param)| (key.as_str(), param))
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// `true` if no key is bound.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl FromIterator<(String, Param)> for Query {
    fn from_iter<I: IntoIterator<Item = (String, Param)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}
