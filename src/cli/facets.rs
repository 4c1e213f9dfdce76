//! Resolve and print facet state for a resource.
//!
//! Every requested facet is derived once to start its aggregate fetches, the
//! fetches are awaited, and the facets are derived again from the settled
//! cache. Output is a single JSON object:
//!
//! ```json
//! {
//!   "keywords": { "label": "rose" },
//!   "options": { "category": [{ "value": "roses", "count": 12, "selected": true }] },
//!   "range": { "price": { "type": "xsd:decimal", "min": 1.5, "max": 99 } },
//!   "order": { "price": false },
//!   "page": { "offset": 0, "limit": 10, "count": 42, "next": 10 }
//! }
//! ```

use anyhow::Result;
use clap::Args;
use serde_json::{Map, Value as Json};

use super::common::{CommandContext, CommandExecutor, parse_query, print_json, settle_all};
use crate::facets;
use crate::graph::Graph;
use crate::query::Query;

/// Command to derive facet state.
#[derive(Debug, Args)]
pub struct FacetsCommand {
    /// Resource id of the collection
    #[arg(value_name = "ID")]
    pub id: String,

    /// Current query as a JSON object
    #[arg(long, value_name = "JSON")]
    pub query: Option<String>,

    /// Paths to report keyword filters for
    #[arg(long = "keywords", value_name = "PATH")]
    pub keywords: Vec<String>,

    /// Paths to report selectable options for
    #[arg(long = "options", value_name = "PATH")]
    pub options: Vec<String>,

    /// Paths to report value ranges for
    #[arg(long = "range", value_name = "PATH")]
    pub range: Vec<String>,

    /// Paths to report sort direction for
    #[arg(long = "order", value_name = "PATH")]
    pub order: Vec<String>,

    /// Report the pagination window
    #[arg(long)]
    pub page: bool,
}

impl FacetsCommand {
    /// Derive every requested facet from the current cache contents.
    pub fn derive(&self, graph: &Graph, query: &Query) -> Result<Json> {
        let mut report = Map::new();

        if !self.keywords.is_empty() {
            let mut section = Map::new();
            for path in &self.keywords {
                let (keywords, _) = facets::keywords_in(path, query, graph.language())?;
                section.insert(path.clone(), Json::String(keywords));
            }
            report.insert("keywords".to_string(), Json::Object(section));
        }

        if !self.options.is_empty() {
            let mut section = Map::new();
            for path in &self.options {
                let (options, _) = facets::options(graph, &self.id, path, query)?;
                section.insert(path.clone(), serde_json::to_value(options)?);
            }
            report.insert("options".to_string(), Json::Object(section));
        }

        if !self.range.is_empty() {
            let mut section = Map::new();
            for path in &self.range {
                let (range, _) = facets::range(graph, &self.id, path, query)?;
                section.insert(path.clone(), serde_json::to_value(range)?);
            }
            report.insert("range".to_string(), Json::Object(section));
        }

        if !self.order.is_empty() {
            let mut section = Map::new();
            for path in &self.order {
                let (ascending, _) = facets::order(path, query)?;
                section.insert(path.clone(), ascending.map_or(Json::Null, Json::Bool));
            }
            report.insert("order".to_string(), Json::Object(section));
        }

        if self.page {
            let (page, _) = facets::page(graph, &self.id, query);
            report.insert("page".to_string(), serde_json::to_value(page)?);
        }

        Ok(Json::Object(report))
    }
}

impl CommandExecutor for FacetsCommand {
    async fn execute_with_context(self, context: CommandContext) -> Result<()> {
        let query = parse_query(self.query.as_deref())?;
        let graph = context.graph()?;

        self.derive(&graph, &query)?;
        settle_all(&graph).await?;

        tracing::debug!("derived facets from {} cached entries", graph.len());

        print_json(&self.derive(&graph, &query)?)
    }
}
