//! Test utilities for facet-graph
//!
//! Helpers shared by unit and integration tests:
//!
//! - [`init_test_logging`] routes `tracing` output through the test harness
//! - [`MockTransport`] serves scripted responses without a network, counts
//!   fetches per URL and can hold fetches pending behind a [`Gate`]
//!
//! # Example
//!
//! ```rust,no_run
//! use facet_graph::graph::Graph;
//! use facet_graph::query::Query;
//! use facet_graph::test_utils::MockTransport;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let transport = Arc::new(MockTransport::new());
//! transport.respond("/items", json!({ "label": "Items" }));
//!
//! let graph = Graph::new(transport.clone());
//! let value = graph.entry("/items", &json!({}), &Query::new()).settle().await?;
//!
//! assert_eq!(value["label"], "Items");
//! assert_eq!(transport.fetch_count("/items"), 1);
//! # Ok(())
//! # }
//! ```

pub mod transport;

pub use transport::{Gate, MockTransport};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` if given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=facet_graph=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
