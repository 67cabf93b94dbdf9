//! Project executors.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Args, ToolExecutor};
use crate::backend::{Backend, NewProject, ProjectChanges, ProjectFilter};

pub struct ListProjects;

#[async_trait]
impl ToolExecutor for ListProjects {
    fn tool_name(&self) -> &'static str {
        "list_onto_projects"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let filter = ProjectFilter {
            state_key: args.str_arg("state_key").map(str::to_string),
            limit: Some(args.usize_arg_or("limit", 20)),
            offset: Some(args.usize_arg_or("offset", 0)),
        };
        let projects = backend.list_projects(filter).await?;
        Ok(json!({
            "projects": projects,
            "count": projects.len(),
            "message": format!("Found {} project(s)", projects.len()),
        }))
    }
}

pub struct GetProject;

#[async_trait]
impl ToolExecutor for GetProject {
    fn tool_name(&self) -> &'static str {
        "get_onto_project_details"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let project_id = args.require_str("project_id")?;
        let project = backend
            .get_project(project_id)
            .await?
            .ok_or_else(|| anyhow!("project not found: {project_id}"))?;
        Ok(json!({
            "project": project,
            "message": format!("Project \"{}\"", project.name),
        }))
    }
}

pub struct CreateProject;

#[async_trait]
impl ToolExecutor for CreateProject {
    fn tool_name(&self) -> &'static str {
        "create_onto_project"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let new = NewProject {
            name: args.require_str("name")?.to_string(),
            description: args.str_arg("description").map(str::to_string),
            type_key: args.str_arg("type_key").map(str::to_string),
            state_key: args.str_arg("state_key").map(str::to_string),
        };
        let project = backend.create_project(new).await?;
        Ok(json!({
            "project": project,
            "message": format!("Created project \"{}\" ({})", project.name, project.id),
        }))
    }
}

pub struct UpdateProject;

#[async_trait]
impl ToolExecutor for UpdateProject {
    fn tool_name(&self) -> &'static str {
        "update_onto_project"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let project_id = args.require_str("project_id")?;
        let changes = ProjectChanges {
            name: args.str_arg("name").map(str::to_string),
            description: args.str_arg("description").map(str::to_string),
            state_key: args.str_arg("state_key").map(str::to_string),
        };
        let project = backend
            .update_project(project_id, changes)
            .await?
            .ok_or_else(|| anyhow!("project not found: {project_id}"))?;
        Ok(json!({
            "project": project,
            "message": format!("Updated project \"{}\"", project.name),
        }))
    }
}

pub struct DeleteProject;

#[async_trait]
impl ToolExecutor for DeleteProject {
    fn tool_name(&self) -> &'static str {
        "delete_onto_project"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let project_id = args.require_str("project_id")?;
        if !backend.delete_project(project_id).await? {
            return Err(anyhow!("project not found: {project_id}"));
        }
        Ok(json!({
            "deleted": true,
            "project_id": project_id,
            "message": format!("Deleted project {project_id}"),
        }))
    }
}
