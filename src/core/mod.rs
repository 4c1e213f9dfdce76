//! Core types shared across facet-graph.
//!
//! The core module holds the error vocabulary used by every other module:
//! - [`GraphError`] - enumerated failure modes of library operations
//! - [`ErrorContext`] - user-facing wrapper with details and suggestions
//! - [`user_friendly_error`] - conversion from any [`anyhow::Error`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use facet_graph::core::{GraphError, user_friendly_error};
//!
//! fn parse() -> anyhow::Result<()> {
//!     Err(GraphError::InvalidQuery { reason: "not an object".into() }.into())
//! }
//!
//! if let Err(e) = parse() {
//!     user_friendly_error(e).display();
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, GraphError, user_friendly_error};
