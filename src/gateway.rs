//! The `tool_help` / `tool_exec` gateway.
//!
//! The gateway owns the registry instance explicitly; nothing here relies
//! on a module import having warmed a global. `tool_help` never fails.
//! `tool_exec` resolves the op (after alias normalization) to a tool name
//! and dispatches to its executor; every error payload carries a
//! `help_path` so the calling agent can recover with the documented
//! help-then-retry loop.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use crate::aliases::normalize_op;
use crate::backend::Backend;
use crate::executors::ExecutorRegistry;
use crate::help::{get_help, HelpOptions, HelpResult};
use crate::registry::ToolRegistry;
use crate::schema;

/// Error payload returned to the agent. Serialized as-is into the tool
/// error channel.
#[derive(Debug, Clone, Serialize, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
    /// Path the agent should pass to `tool_help` before retrying.
    pub help_path: String,
}

pub struct Gateway {
    registry: Arc<ToolRegistry>,
    executors: ExecutorRegistry,
    backend: Arc<dyn Backend>,
}

impl Gateway {
    pub fn new(registry: Arc<ToolRegistry>, backend: Arc<dyn Backend>) -> Self {
        Self {
            registry,
            executors: ExecutorRegistry::new(),
            backend,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Schema-driven help for an op or namespace prefix. Infallible: every
    /// path resolves to a directory, op help, or `not_found`.
    pub fn tool_help(&self, path: &str, options: &HelpOptions) -> HelpResult {
        get_help(&self.registry, path, options)
    }

    /// Execute a canonical (or legacy-aliased) op with the given args.
    pub async fn tool_exec(&self, op: &str, args: Value) -> Result<Value, GatewayError> {
        let canonical = normalize_op(op);
        let Some(entry) = self.registry.get(&canonical) else {
            return Err(GatewayError {
                message: format!("unknown op `{canonical}`"),
                help_path: self.nearest_help_path(&canonical),
            });
        };

        if !args.is_object() {
            return Err(GatewayError {
                message: format!("args for `{canonical}` must be a JSON object"),
                help_path: canonical,
            });
        }
        // The command contract forbids empty args for ops with required
        // parameters; catch it here so the agent gets pointed at help
        // instead of an executor error.
        let required = schema::required(&entry.parameters_schema);
        let is_empty = args.as_object().map(|o| o.is_empty()).unwrap_or(true);
        if is_empty && !required.is_empty() {
            return Err(GatewayError {
                message: format!(
                    "`{canonical}` requires args ({}); never call tool_exec with empty args",
                    required.join(", ")
                ),
                help_path: canonical,
            });
        }

        debug!(op = %canonical, tool = %entry.tool_name, "dispatching tool_exec");
        let start = Instant::now();
        let result = self
            .executors
            .dispatch(&entry.tool_name, self.backend.as_ref(), args)
            .await;
        info!(
            op = %canonical,
            duration_ms = start.elapsed().as_millis() as u64,
            success = result.is_ok(),
            "tool execution completed"
        );

        result.map_err(|e| GatewayError {
            message: e.to_string(),
            help_path: canonical,
        })
    }

    /// The most specific help path worth suggesting for an unresolved op:
    /// the op's group if the registry knows it, else the root directory.
    fn nearest_help_path(&self, canonical: &str) -> String {
        if let Some(group) = canonical.split('.').next() {
            if self
                .registry
                .ops()
                .any(|op| op.group.as_str() == group)
            {
                return group.to_string();
            }
        }
        "root".to_string()
    }
}
