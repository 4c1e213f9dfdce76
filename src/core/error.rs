//! Error handling for facet-graph
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** for precise handling in library code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`GraphError`] - enumerated failures surfaced by library operations
//! - [`ErrorContext`] - wrapper adding details and a suggestion for display
//! - [`user_friendly_error`] - converts any [`anyhow::Error`] into an [`ErrorContext`]
//!
//! Transport failures are deliberately *not* raised through [`GraphError`] by the
//! cache: they are captured into entry state and surfaced through
//! [`Entry::probe`](crate::graph::Entry::probe). [`GraphError::Transport`] only
//! appears where a caller explicitly awaits a fetch outcome (the CLI, for example).
//!
//! # Examples
//!
//! ```rust,no_run
//! use facet_graph::core::{ErrorContext, GraphError, user_friendly_error};
//!
//! let error = GraphError::InvalidQuery {
//!     reason: "expected a JSON object".to_string(),
//! };
//!
//! let context = user_friendly_error(anyhow::Error::from(error));
//! context.display(); // colored error with suggestion
//! ```

use crate::graph::TransportError;
use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for facet-graph operations.
///
/// # Error Categories
///
/// ## Cache and entries
/// - [`Transport`] - a fetch outcome awaited by the caller failed
/// - [`UnpatchableEntry`] - a local mutation was attempted on an entry without a value
///
/// ## Queries
/// - [`InvalidQuery`] - a query document could not be interpreted
/// - [`InvalidPath`] - a facet path is empty or carries an operator prefix
///
/// ## Configuration and I/O
/// - [`ConfigError`] - configuration failed validation
/// - [`IoError`], [`JsonError`], [`TomlError`], [`TomlSerError`] - conversions
/// - [`Other`] - anything else, carrying its message
///
/// [`Transport`]: GraphError::Transport
/// [`UnpatchableEntry`]: GraphError::UnpatchableEntry
/// [`InvalidQuery`]: GraphError::InvalidQuery
/// [`InvalidPath`]: GraphError::InvalidPath
/// [`ConfigError`]: GraphError::ConfigError
/// [`IoError`]: GraphError::IoError
/// [`JsonError`]: GraphError::JsonError
/// [`TomlError`]: GraphError::TomlError
/// [`TomlSerError`]: GraphError::TomlSerError
/// [`Other`]: GraphError::Other
#[derive(Error, Debug)]
pub enum GraphError {
    /// A fetch failed while the caller was waiting on its outcome
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A local mutation could not be applied to an entry
    ///
    /// Only resolved entries accept patches, and only object deltas can be
    /// overlaid on their value.
    #[error("Cannot patch entry '{key}' in state {state}")]
    UnpatchableEntry {
        /// Cache key of the entry
        key: String,
        /// Human-readable state or reason
        state: String,
    },

    /// Query document could not be interpreted
    #[error("Invalid query: {reason}")]
    InvalidQuery {
        /// Why the query was rejected
        reason: String,
    },

    /// Facet path is not a bare property path
    #[error("Invalid facet path '{path}'")]
    InvalidPath {
        /// The offending path
        path: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// I/O error from [`std::io::Error`]
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error from [`serde_json::Error`]
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error from [`toml::de::Error`]
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error from [`toml::ser::Error`]
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information.
///
/// Displayed by the CLI with color coding: the error in red, details in
/// yellow and the suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: GraphError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details.
    #[must_use]
    pub const fn new(error: GraphError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Walks the error chain looking for a [`GraphError`] or a well-known library
/// error and attaches a suggestion tailored to it. Anything unrecognised is
/// reported as [`GraphError::Other`] carrying the full chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(graph_error) = cause.downcast_ref::<GraphError>() {
            return create_error_context(graph_error);
        }

        if let Some(transport_error) = cause.downcast_ref::<TransportError>() {
            return create_error_context(&GraphError::Transport(transport_error.clone()));
        }

        if let Some(json_error) = cause.downcast_ref::<serde_json::Error>() {
            return ErrorContext::new(GraphError::InvalidQuery {
                reason: json_error.to_string(),
            })
            .with_suggestion("Pass the query as a JSON object, e.g. --query '{\"~label\": \"rose\"}'");
        }

        if let Some(toml_error) = cause.downcast_ref::<toml::de::Error>() {
            return ErrorContext::new(GraphError::ConfigError {
                message: toml_error.to_string(),
            })
            .with_suggestion("Check the TOML syntax of your configuration file")
            .with_details("Configuration is read from ~/.facet-graph/config.toml unless --config is given");
        }
    }

    ErrorContext::new(GraphError::Other {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: &GraphError) -> ErrorContext {
    match error {
        GraphError::Transport(transport) => {
            let suggestion = match transport {
                TransportError::Status { status, .. } if *status == 404 => {
                    "Check that the resource id is correct and exists on the server"
                }
                TransportError::Status { .. } => {
                    "The server rejected the request; check the query parameters it supports"
                }
                TransportError::Malformed { .. } => {
                    "The server did not return a JSON object; check the Accept header it honours"
                }
                _ => "Check your network connection and the configured base URL",
            };

            ErrorContext::new(GraphError::Transport(transport.clone()))
                .with_suggestion(suggestion)
                .with_details("Failed fetches are terminal for their cache key; retry with a new query or evict the key")
        }

        GraphError::UnpatchableEntry { key, state } => {
            ErrorContext::new(GraphError::UnpatchableEntry {
                key: key.clone(),
                state: state.clone(),
            })
            .with_suggestion("Wait for the entry to resolve before applying local changes")
        }

        GraphError::InvalidQuery { reason } => ErrorContext::new(GraphError::InvalidQuery {
            reason: reason.clone(),
        })
        .with_suggestion("Queries are JSON objects mapping parameter keys to values or arrays of values"),

        GraphError::InvalidPath { path } => ErrorContext::new(GraphError::InvalidPath {
            path: path.clone(),
        })
        .with_suggestion("Facet paths are bare property paths; operators such as '~' or '>=' are added automatically"),

        GraphError::ConfigError { message } => ErrorContext::new(GraphError::ConfigError {
            message: message.clone(),
        })
        .with_suggestion("Check the values in your configuration file"),

        other => ErrorContext::new(GraphError::Other {
            message: other.to_string(),
        }),
    }
}
