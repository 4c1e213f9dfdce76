//! Typed view over query values and resource values.
//!
//! Remote resources travel as JSON, so the storage representation throughout
//! the crate is [`serde_json::Value`]. This module layers a closed sum type,
//! [`Value`], over it together with a total classification function
//! ([`Value::classify`]) so callers never have to guess what an object is.
//!
//! # Variants
//!
//! | Variant              | JSON shape                                                   |
//! |----------------------|--------------------------------------------------------------|
//! | [`Value::Primitive`] | boolean, number or string                                    |
//! | [`Value::Local`]     | non-empty object whose keys are all language tags and whose members are all strings |
//! | [`Value::Frame`]     | object carrying a string `id` (or `@id`)                     |
//! | [`Value::Blank`]     | any other object                                             |
//!
//! Classification is evaluated in Local → Frame → Blank order. Objects with an
//! `id`/`@id` member are never Local, even though `id` is also a valid
//! language tag, since identity keys are reserved for frames.
//!
//! Arrays and `null` are not values: arrays are sequences of values and `null`
//! is the absent sentinel at the JSON boundary.

pub mod label;
pub mod model;

pub use label::{display_label, display_string, guess_label, normalize};
pub use model::{Frozen, Stat, Stats, Term, Terms, freeze, merge, prune};

use regex::Regex;
use serde_json::{Map, Number, Value as Json};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Language tag pattern for the keys of multilingual text maps.
fn language_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z]{2,3}(-[A-Za-z0-9]{1,8})*$").expect("language tag pattern is valid")
    })
}

/// Scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// `true` / `false`
    Boolean(bool),
    /// Any JSON number
    Number(Number),
    /// Any string, including identifiers
    String(String),
}

/// Structured resource fields, shared by blank and identified resources.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resource {
    fields: Map<String, Json>,
}

impl Resource {
    /// Wrap an object's members.
    #[must_use]
    pub fn new(fields: Map<String, Json>) -> Self {
        Self { fields }
    }

    /// Stable identity, read from `id` or `@id`.
    pub fn id(&self) -> Option<&str> {
        identity(&self.fields)
    }

    /// Display label, if present.
    pub fn label(&self) -> Option<&str> {
        self.fields.get("label").and_then(Json::as_str)
    }

    /// Image URL, if present.
    pub fn image(&self) -> Option<&str> {
        self.fields.get("image").and_then(Json::as_str)
    }

    /// Free-text description, if present.
    pub fn comment(&self) -> Option<&str> {
        self.fields.get("comment").and_then(Json::as_str)
    }

    /// Any member, including the display fields above.
    pub fn field(&self, name: &str) -> Option<&Json> {
        self.fields.get(name)
    }

    /// All members.
    pub fn fields(&self) -> &Map<String, Json> {
        &self.fields
    }
}

/// A single query or resource value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean, number or string
    Primitive(Primitive),
    /// Language tag → text
    Local(BTreeMap<String, String>),
    /// Structured resource without stable identity
    Blank(Resource),
    /// Structured resource with a stable identity
    Frame(Resource),
}

impl Value {
    /// Classify a JSON value.
    ///
    /// Returns `None` for arrays and `null`, which are not values.
    pub fn classify(json: &Json) -> Option<Self> {
        match json {
            Json::Null | Json::Array(_) => None,
            Json::Bool(b) => Some(Self::Primitive(Primitive::Boolean(*b))),
            Json::Number(n) => Some(Self::Primitive(Primitive::Number(n.clone()))),
            Json::String(s) => Some(Self::Primitive(Primitive::String(s.clone()))),
            Json::Object(map) if local(map) => Some(Self::Local(
                map.iter()
                    .filter_map(|(tag, text)| text.as_str().map(|text| (tag.clone(), text.to_string())))
                    .collect(),
            )),
            Json::Object(map) if identity(map).is_some() => Some(Self::Frame(Resource::new(map.clone()))),
            Json::Object(map) => Some(Self::Blank(Resource::new(map.clone()))),
        }
    }

    /// Back to JSON.
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Self::Primitive(Primitive::Boolean(b)) => Json::Bool(*b),
            Self::Primitive(Primitive::Number(n)) => Json::Number(n.clone()),
            Self::Primitive(Primitive::String(s)) => Json::String(s.clone()),
            Self::Local(texts) => Json::Object(
                texts.iter().map(|(tag, text)| (tag.clone(), Json::String(text.clone()))).collect(),
            ),
            Self::Blank(resource) | Self::Frame(resource) => Json::Object(resource.fields.clone()),
        }
    }

    /// `true` for multilingual text maps.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// `true` for identified resources.
    pub fn is_frame(&self) -> bool {
        matches!(self, Self::Frame(_))
    }

    /// `true` for structured resources without identity.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }
}

/// Structural check for multilingual text maps.
pub fn is_local(json: &Json) -> bool {
    json.as_object().is_some_and(local)
}

/// Structural check for identified resources.
pub fn is_frame(json: &Json) -> bool {
    json.as_object().is_some_and(|map| !local(map) && identity(map).is_some())
}

/// Structural check for structured resources without identity.
pub fn is_blank(json: &Json) -> bool {
    json.as_object().is_some_and(|map| !local(map) && identity(map).is_none())
}

/// Reduce a value to a comparable key.
///
/// Identified resources collapse to their id; everything else is returned
/// unchanged.
pub fn focus(json: &Json) -> Json {
    match json.as_object() {
        Some(map) if !local(map) => match identity(map) {
            Some(id) => Json::String(id.to_string()),
            None => json.clone(),
        },
        _ => json.clone(),
    }
}

fn local(map: &Map<String, Json>) -> bool {
    !map.is_empty()
        && !map.contains_key("id")
        && !map.contains_key("@id")
        && map
            .iter()
            .all(|(key, value)| value.is_string() && language_tag().is_match(key))
}

fn identity(map: &Map<String, Json>) -> Option<&str> {
    map.get("id")
        .or_else(|| map.get("@id"))
        .and_then(Json::as_str)
}
