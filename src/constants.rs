//! Global constants used throughout the facet-graph codebase.
//!
//! Query key prefixes, display defaults and transport timeouts that are
//! shared by more than one module live here so the wire vocabulary is
//! defined in exactly one place.

use std::time::Duration;

/// Prefix marking a control key (`.terms`, `.offset`, ...).
pub const CONTROL_PREFIX: char = '.';

/// Control key requesting a term-count aggregation over a path.
pub const TERMS: &str = ".terms";

/// Control key requesting a numeric statistics aggregation over a path.
pub const STATS: &str = ".stats";

/// Control key holding the sort criteria.
pub const ORDER: &str = ".order";

/// Control key holding the pagination offset.
pub const OFFSET: &str = ".offset";

/// Control key holding the page size.
pub const LIMIT: &str = ".limit";

/// Operator prefix for keyword filters.
pub const LIKE: &str = "~";

/// Operator prefix for lower range bounds.
pub const AT_LEAST: &str = ">=";

/// Operator prefix for upper range bounds.
pub const AT_MOST: &str = "<=";

/// Operator prefix for the alternate inclusion marker used by option toggling.
pub const ANY: &str = "?";

/// Language tag used when rendering multilingual text without a preference.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Display placeholder rendered for sequence values.
pub const SEQUENCE_PLACEHOLDER: &str = "…";

/// Default timeout for HTTP transport requests (30 seconds).
pub const DEFAULT_TRANSPORT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV: &str = "FACET_GRAPH_CONFIG";
