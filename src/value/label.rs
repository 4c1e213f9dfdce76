//! Display labels and display strings.
//!
//! Labels for identified resources are taken from their `label` field when
//! present, otherwise guessed from the identifier: the final path or fragment
//! segment is extracted, camel-case and kebab/snake-case words are split, and
//! every word is capitalised.
//!
//! ```rust
//! use facet_graph::value::guess_label;
//!
//! assert_eq!(guess_label("https://example.org/fooBar-baz"), "Foo Bar Baz");
//! assert_eq!(guess_label("https://example.org/terms#hasPart"), "Has Part");
//! ```

use super::{Value, is_local};
use crate::constants::SEQUENCE_PLACEHOLDER;
use regex::{Captures, Regex};
use serde_json::{Number, Value as Json};
use std::sync::OnceLock;

fn segment() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^.*?(?:[/#:]([^/#:]+))?(?:/|#|#_|#id|#this)?$").expect("segment pattern is valid")
    })
}

fn camel() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([-a-z0-9])([A-Z])").expect("camel pattern is valid"))
}

fn kebab() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[-_]+").expect("kebab pattern is valid"))
}

fn initial() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b[a-z]").expect("initial pattern is valid"))
}

/// Guess a label from a resource identifier.
///
/// Returns an empty string if no segment can be extracted.
pub fn guess_label(id: &str) -> String {
    let segment = segment()
        .captures(id)
        .and_then(|captures| captures.get(1))
        .map_or("", |m| m.as_str());

    let split = camel().replace_all(segment, "$1 $2");
    let spaced = kebab().replace_all(&split, " ");

    initial()
        .replace_all(&spaced, |captures: &Captures<'_>| captures[0].to_uppercase())
        .into_owned()
}

/// Label for an identifier string or a structured resource.
///
/// Structured resources with a non-empty `label` field use it verbatim; any
/// other resource falls back to a label guessed from its id, if any.
pub fn display_label(value: &Json) -> String {
    match Value::classify(value) {
        Some(Value::Frame(resource) | Value::Blank(resource)) => match resource.label() {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => guess_label(resource.id().unwrap_or_default()),
        },
        _ => value.as_str().map(guess_label).unwrap_or_default(),
    }
}

/// Render any value, sequence or absent value to a display string.
///
/// - absent (`None` or `null`) → empty string
/// - sequence → a fixed placeholder
/// - multilingual text → the text for `language`, or empty string
/// - structured resource → its display label
/// - number → en-style grouping with at most three fraction digits
/// - anything else → its plain string form
pub fn display_string(value: Option<&Json>, language: &str) -> String {
    match value {
        None | Some(Json::Null) => String::new(),
        Some(Json::Array(_)) => SEQUENCE_PLACEHOLDER.to_string(),
        Some(json @ Json::Object(map)) => {
            if is_local(json) {
                map.get(language)
                    .and_then(Json::as_str)
                    .unwrap_or_default()
                    .to_string()
            } else {
                display_label(json)
            }
        }
        Some(Json::Number(number)) => format_number(number),
        Some(Json::Bool(b)) => b.to_string(),
        Some(Json::String(s)) => s.clone(),
    }
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn format_number(number: &Number) -> String {
    if let Some(n) = number.as_i64() {
        let grouped = group(&n.unsigned_abs().to_string());
        return if n < 0 { format!("-{grouped}") } else { grouped };
    }

    if let Some(n) = number.as_u64() {
        return group(&n.to_string());
    }

    let Some(n) = number.as_f64() else {
        return number.to_string();
    };

    if !n.is_finite() {
        return n.to_string();
    }

    let fixed = format!("{:.3}", n.abs());
    let fixed = fixed.trim_end_matches('0').trim_end_matches('.');
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed, ""));

    let sign = if n < 0.0 && fixed != "0" { "-" } else { "" };

    if fraction.is_empty() {
        format!("{sign}{}", group(integer))
    } else {
        format!("{sign}{}.{fraction}", group(integer))
    }
}

fn group(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}
