//! Single-dispatch reads over entry state.
//!
//! A [`Probe`] has four optional slots, each either a plain value or a
//! function of the state payload and the entry's request model:
//!
//! | Entry state  | Slot consulted | Fallback |
//! |--------------|----------------|----------|
//! | resolved     | `value`        | `other`  |
//! | failed       | `error`        | `other`  |
//! | pending      | `blank`        | `other`  |
//! | unresolved   | -              | `other`  |
//!
//! Exactly one slot is evaluated. A function slot may itself return `None`;
//! that result is final and does not fall through to `other`.
//!
//! ```rust
//! use facet_graph::graph::Probe;
//!
//! let probe: Probe<'_, String> = Probe::new()
//!     .on_value(|value, _model| value["label"].as_str().map(str::to_string))
//!     .on_error(|error, _model| Some(error.to_string()))
//!     .blank("loading…".to_string());
//! # let _ = probe;
//! ```

use super::TransportError;
use serde_json::Value as Json;

enum Slot<'a, P, R> {
    Const(R),
    Call(Box<dyn FnOnce(&P, &Json) -> Option<R> + 'a>),
}

impl<P, R> Slot<'_, P, R> {
    fn apply(self, payload: &P, model: &Json) -> Option<R> {
        match self {
            Self::Const(value) => Some(value),
            Self::Call(f) => f(payload, model),
        }
    }
}

/// Handlers for [`Entry::probe`](super::Entry::probe).
pub struct Probe<'a, R> {
    value: Option<Slot<'a, Json, R>>,
    error: Option<Slot<'a, TransportError, R>>,
    blank: Option<Slot<'a, (), R>>,
    other: Option<Slot<'a, (), R>>,
}

impl<R> Default for Probe<'_, R> {
    fn default() -> Self {
        Self {
            value: None,
            error: None,
            blank: None,
            other: None,
        }
    }
}

impl<'a, R> Probe<'a, R> {
    /// Probe with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Project the resolved value (and model).
    #[must_use]
    pub fn on_value(mut self, f: impl FnOnce(&Json, &Json) -> Option<R> + 'a) -> Self {
        self.value = Some(Slot::Call(Box::new(f)));
        self
    }

    /// Fixed result for resolved entries.
    #[must_use]
    pub fn value(mut self, result: R) -> Self {
        self.value = Some(Slot::Const(result));
        self
    }

    /// Project the failure (and model).
    #[must_use]
    pub fn on_error(mut self, f: impl FnOnce(&TransportError, &Json) -> Option<R> + 'a) -> Self {
        self.error = Some(Slot::Call(Box::new(f)));
        self
    }

    /// Fixed result for failed entries.
    #[must_use]
    pub fn error(mut self, result: R) -> Self {
        self.error = Some(Slot::Const(result));
        self
    }

    /// Project the model of a pending entry.
    #[must_use]
    pub fn on_blank(mut self, f: impl FnOnce(&Json) -> Option<R> + 'a) -> Self {
        self.blank = Some(Slot::Call(Box::new(move |_: &(), model: &Json| f(model))));
        self
    }

    /// Fixed result for pending entries.
    #[must_use]
    pub fn blank(mut self, result: R) -> Self {
        self.blank = Some(Slot::Const(result));
        self
    }

    /// Fallback projection of the model for any state without a matching slot.
    #[must_use]
    pub fn on_other(mut self, f: impl FnOnce(&Json) -> Option<R> + 'a) -> Self {
        self.other = Some(Slot::Call(Box::new(move |_: &(), model: &Json| f(model))));
        self
    }

    /// Fixed fallback for any state without a matching slot.
    #[must_use]
    pub fn other(mut self, result: R) -> Self {
        self.other = Some(Slot::Const(result));
        self
    }

    pub(crate) fn resolved(self, value: &Json, model: &Json) -> Option<R> {
        match self.value {
            Some(slot) => slot.apply(value, model),
            None => Self::fallback(self.other, model),
        }
    }

    pub(crate) fn failed(self, error: &TransportError, model: &Json) -> Option<R> {
        match self.error {
            Some(slot) => slot.apply(error, model),
            None => Self::fallback(self.other, model),
        }
    }

    pub(crate) fn pending(self, model: &Json) -> Option<R> {
        match self.blank {
            Some(slot) => slot.apply(&(), model),
            None => Self::fallback(self.other, model),
        }
    }

    pub(crate) fn unresolved(self, model: &Json) -> Option<R> {
        Self::fallback(self.other, model)
    }

    fn fallback(other: Option<Slot<'a, (), R>>, model: &Json) -> Option<R> {
        other.and_then(|slot| slot.apply(&(), model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error() -> TransportError {
        TransportError::Aborted {
            url: "/x".to_string(),
        }
    }

    #[test]
    fn test_value_slot() {
        let probe = Probe::new().on_value(|value: &Json, _| value["n"].as_i64());
        assert_eq!(probe.resolved(&json!({"n": 3}), &json!({})), Some(3));

        let probe = Probe::new().value(7).other(0);
        assert_eq!(probe.resolved(&json!({}), &json!({})), Some(7));
    }

    #[test]
    fn test_function_none_does_not_fall_through() {
        let probe = Probe::new().on_value(|_, _| None).other(1);
        assert_eq!(probe.resolved(&json!({}), &json!({})), None);
    }

    #[test]
    fn test_fallback_to_other() {
        let model = json!({"terms": []});

        let probe = Probe::<&str>::new().on_other(|model| model.get("terms").map(|_| "model"));
        assert_eq!(probe.failed(&error(), &model), Some("model"));

        assert_eq!(Probe::new().other("x").pending(&model), Some("x"));
        assert_eq!(Probe::new().other("x").unresolved(&model), Some("x"));
        assert_eq!(Probe::<&str>::new().value("v").unresolved(&model), None);
    }

    #[test]
    fn test_error_and_blank_slots() {
        let probe = Probe::new().on_error(|error, _| Some(error.to_string()));
        assert_eq!(probe.failed(&error(), &json!({})), Some("Fetch of /x was aborted".to_string()));

        let probe = Probe::new().blank("loading").other("other");
        assert_eq!(probe.pending(&json!({})), Some("loading"));
    }
}
