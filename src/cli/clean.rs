//! Print a query after cleaning.

use anyhow::Result;
use clap::Args;

use super::common::{CommandContext, CommandExecutor, parse_query, print_json};
use crate::query::{Retention, clean_with};

/// Command to clean a query.
#[derive(Debug, Args)]
pub struct CleanCommand {
    /// Query as a JSON object
    #[arg(long, value_name = "JSON")]
    pub query: Option<String>,

    /// Treat falsy facet values (0, false, "") as absent
    #[arg(long)]
    pub truthy: bool,
}

impl CommandExecutor for CleanCommand {
    async fn execute_with_context(self, context: CommandContext) -> Result<()> {
        let retention = if self.truthy {
            Retention::Truthy
        } else {
            context.config.retention
        };

        let query = parse_query(self.query.as_deref())?;
        print_json(&clean_with(&query, retention).to_json())
    }
}
