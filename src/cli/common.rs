//! Common utilities for CLI commands

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::GraphConfig;
use crate::graph::{Graph, Status};
use crate::query::Query;

/// Common trait for CLI command execution
pub trait CommandExecutor: Sized {
    /// Execute the command against a loaded context
    fn execute_with_context(
        self,
        context: CommandContext,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Configuration shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Loaded configuration (defaults if no file exists)
    pub config: GraphConfig,
}

impl CommandContext {
    /// Load the configuration from `path`, `FACET_GRAPH_CONFIG` or the
    /// default location
    pub async fn load(path: Option<PathBuf>) -> Result<Self> {
        let config = GraphConfig::load_with_optional(path).await?;
        Ok(Self { config })
    }

    /// Graph over HTTP configured from this context
    pub fn graph(&self) -> Result<Graph> {
        Graph::http(&self.config).context("Failed to set up the HTTP transport")
    }
}

/// Parse a `--query` argument; no argument means the empty query.
pub fn parse_query(query: Option<&str>) -> Result<Query> {
    let Some(text) = query else {
        return Ok(Query::new());
    };

    let json: serde_json::Value =
        serde_json::from_str(text).with_context(|| format!("Failed to parse query: {text}"))?;

    Ok(Query::from_json(&json)?)
}

/// Print `value` to stdout as pretty JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{rendered}");
    Ok(())
}

/// Wait until no entry of `graph` is pending.
///
/// Fails with the first fetch error encountered.
pub async fn settle_all(graph: &Graph) -> Result<()> {
    loop {
        let pending: Vec<_> = graph
            .entries()
            .into_iter()
            .filter(|entry| matches!(entry.state(), Status::Pending | Status::Unresolved))
            .collect();

        if pending.is_empty() {
            break;
        }

        for entry in pending {
            entry
                .settle()
                .await
                .with_context(|| format!("Failed to fetch {}", entry.key()))?;
        }
    }

    for entry in graph.entries() {
        if let Some(error) = entry.error() {
            return Err(anyhow::Error::from(crate::graph::TransportError::clone(&error)))
                .with_context(|| format!("Failed to fetch {}", entry.key()));
        }
    }

    Ok(())
}
