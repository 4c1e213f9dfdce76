//! Command-line interface for facet-graph.
//!
//! Each command lives in its own module with its own argument structure and
//! implements [`CommandExecutor`](common::CommandExecutor).
//!
//! # Available Commands
//!
//! - `key` - Print the canonical cache key for an id and query
//! - `clean` - Print a query after cleaning
//! - `fetch` - Fetch one resource through the graph cache and print it
//! - `facets` - Derive keyword, option, range, order and page facets
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only report errors
//! - `--config <PATH>` - Use a specific configuration file
//!
//! Logs go to stderr; command output (JSON or a key) goes to stdout.
//!
//! ```bash
//! facet-graph key /products --query '{"category": "roses"}'
//! facet-graph clean --query '{"color": null, ".offset": 0}'
//! facet-graph --config ./graph.toml fetch /products/42
//! facet-graph facets /products --options category --range price --page
//! ```

mod clean;
pub mod common;
mod facets;
mod fetch;
mod key;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use common::{CommandContext, CommandExecutor};

/// Runtime settings derived from the global CLI flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set; `None` leaves logging off
    pub log_level: Option<String>,

    /// Configuration file overriding the default location
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create a configuration with logging off and the default config file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the stderr log subscriber.
    ///
    /// `RUST_LOG` takes precedence over the level chosen by the flags. Only
    /// the first call in a process has an effect.
    pub fn init_logging(&self) {
        let filter = match (EnvFilter::try_from_default_env(), &self.log_level) {
            (Ok(filter), _) => filter,
            (Err(_), Some(level)) => EnvFilter::new(level),
            (Err(_), None) => return,
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Main CLI structure for facet-graph.
#[derive(Parser)]
#[command(
    name = "facet-graph",
    about = "Query-keyed resource cache and facet derivation",
    version,
    author,
    long_about = "facet-graph caches JSON resources keyed by id and query and derives \
                  faceted-search state (options, ranges, order, pages) from them."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file.
    ///
    /// Defaults to `FACET_GRAPH_CONFIG`, then `~/.facet-graph/config.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical cache key for an id and query.
    Key(key::KeyCommand),

    /// Print a query after cleaning.
    Clean(clean::CleanCommand),

    /// Fetch one resource and print its resolved value.
    Fetch(fetch::FetchCommand),

    /// Derive facet state for a collection.
    Facets(facets::FacetsCommand),
}

impl Cli {
    /// Execute the CLI with configuration built from the parsed flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    ///
    /// `--verbose` logs at `debug`, `--quiet` at `error`, otherwise `info`.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            config_path: self.config.clone(),
        }
    }

    /// Execute the CLI with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        let context = CommandContext::load(config.config_path).await?;

        match self.command {
            Commands::Key(cmd) => cmd.execute_with_context(context).await,
            Commands::Clean(cmd) => cmd.execute_with_context(context).await,
            Commands::Fetch(cmd) => cmd.execute_with_context(context).await,
            Commands::Facets(cmd) => cmd.execute_with_context(context).await,
        }
    }
}
