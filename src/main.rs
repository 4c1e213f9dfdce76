//! facet-graph CLI entry point
//!
//! Parses arguments, runs the selected command and renders failures as
//! user-friendly errors:
//! - `key` - Print the canonical cache key for an id and query
//! - `clean` - Print a cleaned query
//! - `fetch` - Fetch and print one resource
//! - `facets` - Derive facet state for a collection

use anyhow::Result;
use clap::Parser;
use facet_graph::cli;
use facet_graph::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
