//! Print the canonical cache key of a resource id and query.
//!
//! ```bash
//! facet-graph key /products --query '{"category": ["roses"], "color": null}'
//! # /products?%7B%22category%22%3A%5B%22roses%22%5D%7D
//! ```

use anyhow::Result;
use clap::Args;

use super::common::{CommandContext, CommandExecutor, parse_query};
use crate::query::canonical_key;

/// Command to print a canonical cache key.
#[derive(Debug, Args)]
pub struct KeyCommand {
    /// Resource id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Query as a JSON object
    #[arg(long, value_name = "JSON")]
    pub query: Option<String>,
}

impl KeyCommand {
    /// Canonical key for this command's id and query.
    pub fn key(&self, context: &CommandContext) -> Result<String> {
        let query = parse_query(self.query.as_deref())?;
        Ok(canonical_key(&self.id, &query, context.config.retention))
    }
}

impl CommandExecutor for KeyCommand {
    async fn execute_with_context(self, context: CommandContext) -> Result<()> {
        println!("{}", self.key(&context)?);
        Ok(())
    }
}
