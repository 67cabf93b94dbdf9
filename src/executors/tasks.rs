//! Task executors.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Args, ToolExecutor};
use crate::backend::{Backend, NewTask, TaskChanges, TaskFilter};

pub struct ListTasks;

#[async_trait]
impl ToolExecutor for ListTasks {
    fn tool_name(&self) -> &'static str {
        "list_onto_tasks"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let filter = TaskFilter {
            project_id: args.str_arg("project_id").map(str::to_string),
            state_key: args.str_arg("state_key").map(str::to_string),
            include_done: args.bool_arg_or("include_done", false),
            limit: Some(args.usize_arg_or("limit", 20)),
            offset: Some(args.usize_arg_or("offset", 0)),
        };
        let tasks = backend.list_tasks(filter).await?;
        Ok(json!({
            "tasks": tasks,
            "count": tasks.len(),
            "message": format!("Found {} task(s)", tasks.len()),
        }))
    }
}

pub struct SearchTasks;

#[async_trait]
impl ToolExecutor for SearchTasks {
    fn tool_name(&self) -> &'static str {
        "search_onto_tasks"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let query = args.require_str("query")?;
        let tasks = backend
            .search_tasks(
                query,
                args.str_arg("project_id"),
                args.usize_arg_or("limit", 20),
            )
            .await?;
        Ok(json!({
            "tasks": tasks,
            "count": tasks.len(),
            "message": format!("Found {} task(s) matching \"{}\"", tasks.len(), query),
        }))
    }
}

pub struct GetTask;

#[async_trait]
impl ToolExecutor for GetTask {
    fn tool_name(&self) -> &'static str {
        "get_onto_task_details"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let task_id = args.require_str("task_id")?;
        let task = backend
            .get_task(task_id)
            .await?
            .ok_or_else(|| anyhow!("task not found: {task_id}"))?;
        Ok(json!({
            "task": task,
            "message": format!("Task \"{}\"", task.title),
        }))
    }
}

pub struct CreateTask;

#[async_trait]
impl ToolExecutor for CreateTask {
    fn tool_name(&self) -> &'static str {
        "create_onto_task"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let new = NewTask {
            title: args.require_str("title")?.to_string(),
            // Required by the catalog schema; NewTask keeps the Option only
            // because backends may detach tasks later.
            project_id: Some(args.require_str("project_id")?.to_string()),
            description: args.str_arg("description").map(str::to_string),
            type_key: args.str_arg("type_key").map(str::to_string),
            state_key: args.str_arg("state_key").map(str::to_string),
            priority: args.i64_arg("priority"),
            due_at: args.datetime_arg("due_at")?,
        };
        let task = backend.create_task(new).await?;
        Ok(json!({
            "task": task,
            "message": format!("Created task \"{}\" ({})", task.title, task.id),
        }))
    }
}

pub struct UpdateTask;

#[async_trait]
impl ToolExecutor for UpdateTask {
    fn tool_name(&self) -> &'static str {
        "update_onto_task"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let task_id = args.require_str("task_id")?;
        let changes = TaskChanges {
            title: args.str_arg("title").map(str::to_string),
            description: args.str_arg("description").map(str::to_string),
            state_key: args.str_arg("state_key").map(str::to_string),
            priority: args.i64_arg("priority"),
        };
        let task = backend
            .update_task(task_id, changes)
            .await?
            .ok_or_else(|| anyhow!("task not found: {task_id}"))?;
        Ok(json!({
            "task": task,
            "message": format!("Updated task \"{}\"", task.title),
        }))
    }
}

pub struct DeleteTask;

#[async_trait]
impl ToolExecutor for DeleteTask {
    fn tool_name(&self) -> &'static str {
        "delete_onto_task"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let task_id = args.require_str("task_id")?;
        if !backend.delete_task(task_id).await? {
            return Err(anyhow!("task not found: {task_id}"));
        }
        Ok(json!({
            "deleted": true,
            "task_id": task_id,
            "message": format!("Deleted task {task_id}"),
        }))
    }
}
