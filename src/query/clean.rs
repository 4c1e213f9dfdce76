//! Query normalization.
//!
//! [`clean`] strips absent and empty facet values from a query while keeping
//! meaningful control parameters, producing the canonical form used for
//! cache-key derivation.
//!
//! # Retention
//!
//! Every value is *scanned* first: sequences are scanned member by member,
//! absent members are dropped, and a sequence left empty becomes absent. A key
//! is kept iff its scanned value is present.
//!
//! What counts as present depends on the [`Retention`] policy:
//!
//! | Policy                  | Facet scalar kept when     | Control scalar kept when |
//! |-------------------------|----------------------------|--------------------------|
//! | [`Retention::Explicit`] | it is not [`Param::Absent`] | it is not absent         |
//! | [`Retention::Truthy`]   | it is truthy               | it is not absent         |
//!
//! `Explicit` is the default: a facet filter on `0`, `false` or `""` is a real
//! filter. `Truthy` reproduces the legacy coercion, where `0`, `false` and
//! `""` facet values were silently treated as absent.
//!
//! Cleaning is idempotent: `clean(&clean(&q)) == clean(&q)`.

use super::{Key, Param, Query, truthy};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Policy deciding which scalar values survive [`clean_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retention {
    /// Only [`Param::Absent`] is absent
    #[default]
    Explicit,
    /// Falsy facet scalars are absent too
    Truthy,
}

/// Clean `query` with the default [`Retention::Explicit`] policy.
#[must_use]
pub fn clean(query: &Query) -> Query {
    clean_with(query, Retention::Explicit)
}

/// Clean `query` with an explicit retention policy.
#[must_use]
pub fn clean_with(query: &Query, retention: Retention) -> Query {
    query
        .iter()
        .filter_map(|(key, param)| {
            let control = Key::parse(key).is_control();

            match scan(param, retention, control) {
                Param::Absent => None,
                scanned => Some((key.to_string(), scanned)),
            }
        })
        .collect()
}

fn scan(param: &Param, retention: Retention, control: bool) -> Param {
    match param {
        Param::Absent | Param::One(Json::Null) => Param::Absent,

        Param::One(Json::Array(members)) => {
            let members = members.iter().cloned().map(Param::from).collect();
            scan(&Param::Many(members), retention, control)
        }

        Param::One(value) => {
            if control || retention == Retention::Explicit || truthy(value) {
                Param::One(value.clone())
            } else {
                Param::Absent
            }
        }

        Param::Many(members) => {
            let scanned: Vec<Param> = members
                .iter()
                .map(|member| scan(member, retention, control))
                .filter(|member| !member.is_absent())
                .collect();

            if scanned.is_empty() {
                Param::Absent
            } else {
                Param::Many(scanned)
            }
        }
    }
}
