//! Cross-entity ontology search executor.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Args, ToolExecutor};
use crate::backend::Backend;

pub struct SearchOntology;

#[async_trait]
impl ToolExecutor for SearchOntology {
    fn tool_name(&self) -> &'static str {
        "search_ontology"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let query = args.require_str("query")?;
        let entity_types = args.str_list_arg("entity_types");
        let hits = backend
            .search_ontology(
                query,
                entity_types.as_deref(),
                args.usize_arg_or("limit", 20),
            )
            .await?;
        Ok(json!({
            "hits": hits,
            "count": hits.len(),
            "message": format!("Found {} hit(s) for \"{}\"", hits.len(), query),
        }))
    }
}
