//! Edge executors: typed links between ontology entities.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Args, ToolExecutor};
use crate::backend::Backend;

pub struct LinkEntities;

#[async_trait]
impl ToolExecutor for LinkEntities {
    fn tool_name(&self) -> &'static str {
        "link_onto_entities"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let source_id = args.require_str("source_id")?;
        let target_id = args.require_str("target_id")?;
        let relation = args.require_str("relation")?;
        let edge = backend.link_entities(source_id, target_id, relation).await?;
        Ok(json!({
            "edge": edge,
            "message": format!("Linked {source_id} -[{relation}]-> {target_id}"),
        }))
    }
}

pub struct UnlinkEntities;

#[async_trait]
impl ToolExecutor for UnlinkEntities {
    fn tool_name(&self) -> &'static str {
        "unlink_onto_entities"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let edge_id = args.require_str("edge_id")?;
        if !backend.unlink_entities(edge_id).await? {
            return Err(anyhow!("edge not found: {edge_id}"));
        }
        Ok(json!({
            "deleted": true,
            "edge_id": edge_id,
            "message": format!("Removed edge {edge_id}"),
        }))
    }
}
