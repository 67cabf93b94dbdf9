//! Document executors, including the tree operations.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Args, ToolExecutor};
use crate::backend::{Backend, DocumentChanges, DocumentFilter, MoveTarget, NewDocument};

pub struct ListDocuments;

#[async_trait]
impl ToolExecutor for ListDocuments {
    fn tool_name(&self) -> &'static str {
        "list_onto_documents"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let filter = DocumentFilter {
            project_id: args.str_arg("project_id").map(str::to_string),
            limit: Some(args.usize_arg_or("limit", 20)),
            offset: Some(args.usize_arg_or("offset", 0)),
        };
        let documents = backend.list_documents(filter).await?;
        Ok(json!({
            "documents": documents,
            "count": documents.len(),
            "message": format!("Found {} document(s)", documents.len()),
        }))
    }
}

pub struct GetDocument;

#[async_trait]
impl ToolExecutor for GetDocument {
    fn tool_name(&self) -> &'static str {
        "get_onto_document_details"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let document_id = args.require_str("document_id")?;
        let mut document = backend
            .get_document(document_id)
            .await?
            .ok_or_else(|| anyhow!("document not found: {document_id}"))?;
        if !args.bool_arg_or("include_content", false) {
            document.body_markdown = None;
        }
        Ok(json!({
            "document": document,
            "message": format!("Document \"{}\"", document.title),
        }))
    }
}

pub struct CreateDocument;

#[async_trait]
impl ToolExecutor for CreateDocument {
    fn tool_name(&self) -> &'static str {
        "create_onto_document"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let new = NewDocument {
            title: args.require_str("title")?.to_string(),
            project_id: args.require_str("project_id")?.to_string(),
            body_markdown: args.str_arg("body_markdown").map(str::to_string),
            parent_id: args.str_arg("parent_id").map(str::to_string),
            type_key: args.str_arg("type_key").map(str::to_string),
        };
        let document = backend.create_document(new).await?;
        Ok(json!({
            "document": document,
            "message": format!("Created document \"{}\" ({})", document.title, document.id),
        }))
    }
}

pub struct UpdateDocument;

#[async_trait]
impl ToolExecutor for UpdateDocument {
    fn tool_name(&self) -> &'static str {
        "update_onto_document"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let document_id = args.require_str("document_id")?;
        let changes = DocumentChanges {
            title: args.str_arg("title").map(str::to_string),
            body_markdown: args.str_arg("body_markdown").map(str::to_string),
            state_key: args.str_arg("state_key").map(str::to_string),
        };
        let document = backend
            .update_document(document_id, changes)
            .await?
            .ok_or_else(|| anyhow!("document not found: {document_id}"))?;
        Ok(json!({
            "document": document,
            "message": format!("Updated document \"{}\"", document.title),
        }))
    }
}

pub struct DeleteDocument;

#[async_trait]
impl ToolExecutor for DeleteDocument {
    fn tool_name(&self) -> &'static str {
        "delete_onto_document"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let document_id = args.require_str("document_id")?;
        if !backend.delete_document(document_id).await? {
            return Err(anyhow!("document not found: {document_id}"));
        }
        Ok(json!({
            "deleted": true,
            "document_id": document_id,
            "message": format!("Deleted document {document_id}"),
        }))
    }
}

pub struct GetDocumentTree;

#[async_trait]
impl ToolExecutor for GetDocumentTree {
    fn tool_name(&self) -> &'static str {
        "get_document_tree"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let project_id = args.require_str("project_id")?;
        let max_depth = args.usize_arg_or("max_depth", 6);
        let tree = backend.document_tree(project_id, max_depth).await?;
        Ok(json!({
            "tree": tree,
            "message": format!("Document tree for project {project_id}"),
        }))
    }
}

pub struct MoveDocumentNode;

#[async_trait]
impl ToolExecutor for MoveDocumentNode {
    fn tool_name(&self) -> &'static str {
        "move_document_node"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let document_id = args.require_str("document_id")?;
        let new_position = args.require_i64("new_position")?;
        // Absent key keeps the current parent; an explicit null detaches to
        // the root level.
        let target = match args.get("new_parent_id") {
            None => MoveTarget::Keep,
            Some(Value::Null) => MoveTarget::Root,
            Some(Value::String(parent_id)) => MoveTarget::Parent(parent_id.clone()),
            Some(other) => {
                return Err(anyhow!(
                    "argument `new_parent_id` must be a string or null, got {other}"
                ))
            }
        };
        let document = backend
            .move_document(document_id, new_position, target)
            .await?
            .ok_or_else(|| anyhow!("document not found: {document_id}"))?;
        Ok(json!({
            "document": document,
            "message": format!(
                "Moved document \"{}\" to position {}",
                document.title, document.position
            ),
        }))
    }
}
