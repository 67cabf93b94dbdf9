//! Public web search executor.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Args, ToolExecutor};
use crate::backend::Backend;

pub struct WebSearch;

#[async_trait]
impl ToolExecutor for WebSearch {
    fn tool_name(&self) -> &'static str {
        "web_search"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let query = args.require_str("query")?;
        let results = backend
            .web_search(
                query,
                args.usize_arg_or("max_results", 5),
                args.str_arg("recency"),
            )
            .await?;
        Ok(json!({
            "results": results,
            "count": results.len(),
            "message": format!("Web search returned {} result(s)", results.len()),
        }))
    }
}
