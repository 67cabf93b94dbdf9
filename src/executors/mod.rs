//! Trait-based executors for the tool catalog.
//!
//! Each tool is a struct implementing `ToolExecutor`, registered by tool
//! name in `ExecutorRegistry`. Executors extract their arguments from the
//! JSON payload, call the backend, and return a JSON result with a
//! human-readable `message` field. Naming, aliasing, and help live in the
//! registry/help modules; nothing here parses op names.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

use crate::backend::Backend;

mod calendar;
mod documents;
mod edges;
mod projects;
mod search;
mod tasks;
mod web;

/// One executable tool. `tool_name` must match a catalog entry.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    fn tool_name(&self) -> &'static str;

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value>;
}

/// Dispatch table from tool name to executor.
pub struct ExecutorRegistry {
    executors: HashMap<&'static str, Box<dyn ToolExecutor>>,
}

impl ExecutorRegistry {
    /// Registry with every shipped executor.
    pub fn new() -> Self {
        let mut registry = Self {
            executors: HashMap::new(),
        };

        registry.register(Box::new(tasks::ListTasks));
        registry.register(Box::new(tasks::SearchTasks));
        registry.register(Box::new(tasks::GetTask));
        registry.register(Box::new(tasks::CreateTask));
        registry.register(Box::new(tasks::UpdateTask));
        registry.register(Box::new(tasks::DeleteTask));

        registry.register(Box::new(projects::ListProjects));
        registry.register(Box::new(projects::GetProject));
        registry.register(Box::new(projects::CreateProject));
        registry.register(Box::new(projects::UpdateProject));
        registry.register(Box::new(projects::DeleteProject));

        registry.register(Box::new(documents::ListDocuments));
        registry.register(Box::new(documents::GetDocument));
        registry.register(Box::new(documents::CreateDocument));
        registry.register(Box::new(documents::UpdateDocument));
        registry.register(Box::new(documents::DeleteDocument));
        registry.register(Box::new(documents::GetDocumentTree));
        registry.register(Box::new(documents::MoveDocumentNode));

        registry.register(Box::new(search::SearchOntology));
        registry.register(Box::new(edges::LinkEntities));
        registry.register(Box::new(edges::UnlinkEntities));

        registry.register(Box::new(web::WebSearch));
        registry.register(Box::new(calendar::ListCalendarEvents));

        registry
    }

    fn register(&mut self, executor: Box<dyn ToolExecutor>) {
        self.executors.insert(executor.tool_name(), executor);
    }

    pub async fn dispatch(
        &self,
        tool_name: &str,
        backend: &dyn Backend,
        args: Value,
    ) -> Result<Value> {
        self.executors
            .get(tool_name)
            .ok_or_else(|| anyhow!("no executor registered for tool: {tool_name}"))?
            .execute(backend, args)
            .await
    }

    pub fn has_tool(&self, tool_name: &str) -> bool {
        self.executors.contains_key(tool_name)
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.executors.keys().copied().collect()
    }
}

impl Default for ExecutorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Argument extraction over the JSON args payload. Optional getters return
/// `None` for missing keys; `require_*` getters produce the error the
/// gateway wraps with a `help_path`.
pub(crate) trait Args {
    fn str_arg(&self, key: &str) -> Option<&str>;
    fn require_str(&self, key: &str) -> Result<&str>;
    fn i64_arg(&self, key: &str) -> Option<i64>;
    fn i64_arg_or(&self, key: &str, default: i64) -> i64;
    fn require_i64(&self, key: &str) -> Result<i64>;
    fn bool_arg_or(&self, key: &str, default: bool) -> bool;
    fn str_list_arg(&self, key: &str) -> Option<Vec<String>>;
    fn datetime_arg(&self, key: &str) -> Result<Option<DateTime<Utc>>>;
    fn usize_arg_or(&self, key: &str, default: usize) -> usize;
}

impl Args for Value {
    fn str_arg(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    fn require_str(&self, key: &str) -> Result<&str> {
        self.str_arg(key)
            .ok_or_else(|| anyhow!("missing required argument `{key}`"))
    }

    fn i64_arg(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    fn i64_arg_or(&self, key: &str, default: i64) -> i64 {
        self.i64_arg(key).unwrap_or(default)
    }

    fn require_i64(&self, key: &str) -> Result<i64> {
        self.i64_arg(key)
            .ok_or_else(|| anyhow!("missing required argument `{key}`"))
    }

    fn bool_arg_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }

    fn str_list_arg(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).and_then(|v| v.as_array()).map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
    }

    fn datetime_arg(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        match self.str_arg(key) {
            None => Ok(None),
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|e| anyhow!("argument `{key}` is not an RFC 3339 timestamp: {e}")),
        }
    }

    fn usize_arg_or(&self, key: &str, default: usize) -> usize {
        self.get(key)
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_covers_catalog() {
        let registry = ExecutorRegistry::new();
        for def in crate::catalog::CATALOG.iter() {
            assert!(
                registry.has_tool(&def.name),
                "catalog tool {} has no executor",
                def.name
            );
        }
        assert_eq!(registry.tool_names().len(), crate::catalog::CATALOG.len());
    }

    #[test]
    fn test_args_extraction() {
        let args = json!({
            "task_id": "t-1",
            "limit": 5,
            "include_done": true,
            "entity_types": ["task", "project"],
            "time_min": "2025-03-03T00:00:00Z"
        });

        assert_eq!(args.str_arg("task_id"), Some("t-1"));
        assert_eq!(args.require_str("task_id").unwrap(), "t-1");
        assert!(args.require_str("missing").is_err());
        assert_eq!(args.i64_arg_or("limit", 20), 5);
        assert_eq!(args.i64_arg_or("offset", 0), 0);
        assert!(args.bool_arg_or("include_done", false));
        assert_eq!(
            args.str_list_arg("entity_types").unwrap(),
            vec!["task".to_string(), "project".to_string()]
        );
        assert!(args.datetime_arg("time_min").unwrap().is_some());
        assert!(args.datetime_arg("absent").unwrap().is_none());
        assert!(json!({"time_min": "yesterday"}).datetime_arg("time_min").is_err());
    }
}
