//! Fetch one entry and print its resolved value.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value as Json;

use super::common::{CommandContext, CommandExecutor, parse_query, print_json};

/// Command to fetch a single resource.
#[derive(Debug, Args)]
pub struct FetchCommand {
    /// Resource id, resolved against the configured base URL
    #[arg(value_name = "ID")]
    pub id: String,

    /// Query as a JSON object
    #[arg(long, value_name = "JSON")]
    pub query: Option<String>,

    /// Request model as a JSON object; its fields are filled in when the
    /// response omits them
    #[arg(long, value_name = "JSON")]
    pub model: Option<String>,
}

impl CommandExecutor for FetchCommand {
    async fn execute_with_context(self, context: CommandContext) -> Result<()> {
        let query = parse_query(self.query.as_deref())?;

        let model: Json = match self.model.as_deref() {
            Some(text) => serde_json::from_str(text)
                .with_context(|| format!("Failed to parse model: {text}"))?,
            None => Json::Object(serde_json::Map::new()),
        };

        let graph = context.graph()?;
        let entry = graph.entry(&self.id, &model, &query);

        tracing::info!("fetching {}", entry.key());

        let value = entry
            .settle()
            .await
            .with_context(|| format!("Failed to fetch {}", entry.key()))?;

        print_json(&*value)
    }
}
