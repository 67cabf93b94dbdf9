//! Static tool catalog for the assistant.
//!
//! Every callable tool is declared here once, with the JSON schema the LLM
//! sees through the function-calling interface. The registry derives the
//! dotted op namespace from these names; nothing in this file knows about
//! ops or help generation.

use lazy_static::lazy_static;
use serde_json::{json, Value};

/// A single tool definition as exposed to the LLM function-calling interface.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON-schema-like parameter specification (`type: "object"`).
    pub parameters: Value,
}

fn tool(name: &str, description: &str, parameters: Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        parameters,
    }
}

lazy_static! {
    /// The shipped tool catalog, in declaration order. Catalog order is part
    /// of the registry version hash, so append new tools at the end of their
    /// section rather than re-sorting.
    pub static ref CATALOG: Vec<ToolDefinition> = build_catalog();
}

fn build_catalog() -> Vec<ToolDefinition> {
    vec![
        // ===== Ontology: cross-entity =====
        tool(
            "search_ontology",
            "Search every ontology entity (tasks, projects, documents) by free text. Returns ranked hits with entity type and id; use it when you do not know which entity kind the user means.",
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Free-text search query"},
                    "entity_types": {
                        "type": "array",
                        "items": {"type": "string", "enum": ["task", "project", "document"]},
                        "description": "Restrict the search to these entity kinds"
                    },
                    "limit": {"type": "integer", "description": "Maximum hits to return", "default": 20}
                },
                "required": ["query"]
            }),
        ),
        tool(
            "link_onto_entities",
            "Create a typed edge between two ontology entities. Use exact UUIDs for both endpoints.",
            json!({
                "type": "object",
                "properties": {
                    "source_id": {"type": "string", "description": "UUID of the source entity"},
                    "target_id": {"type": "string", "description": "UUID of the target entity"},
                    "relation": {
                        "type": "string",
                        "enum": ["references", "blocks", "duplicates", "parent_of"],
                        "description": "Edge type"
                    }
                },
                "required": ["source_id", "target_id", "relation"]
            }),
        ),
        tool(
            "unlink_onto_entities",
            "Remove an existing edge between two ontology entities by its edge id.",
            json!({
                "type": "object",
                "properties": {
                    "edge_id": {"type": "string", "description": "UUID of the edge to remove"}
                },
                "required": ["edge_id"]
            }),
        ),
        // ===== Ontology: tasks =====
        tool(
            "list_onto_tasks",
            "List tasks, optionally filtered by project and state. Returns newest first; page with limit and offset.",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {"type": "string", "description": "Only tasks in this project"},
                    "state_key": {"type": "string", "description": "Only tasks in this workflow state (e.g. 'open', 'done')"},
                    "include_done": {"type": "boolean", "description": "Include completed tasks", "default": false},
                    "limit": {"type": "integer", "description": "Maximum tasks to return", "default": 20},
                    "offset": {"type": "integer", "description": "Number of tasks to skip", "default": 0}
                }
            }),
        ),
        tool(
            "search_onto_tasks",
            "Search tasks by free text over title and description. Prefer this over list_onto_tasks when the user describes a task rather than a filter.",
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Free-text search query"},
                    "project_id": {"type": "string", "description": "Restrict the search to this project"},
                    "limit": {"type": "integer", "description": "Maximum tasks to return", "default": 20}
                },
                "required": ["query"]
            }),
        ),
        tool(
            "get_onto_task_details",
            "Get one task by id, including its full description and timestamps.",
            json!({
                "type": "object",
                "properties": {
                    "task_id": {"type": "string", "description": "UUID of the task"},
                    "include_edges": {"type": "boolean", "description": "Include edges touching this task", "default": false}
                },
                "required": ["task_id"]
            }),
        ),
        tool(
            "create_onto_task",
            "Create a new task in a project. Title and project are required; everything else defaults sensibly.",
            json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "Short task title"},
                    "project_id": {"type": "string", "description": "UUID of the project the task belongs to"},
                    "description": {"type": "string", "description": "Longer task description, markdown allowed"},
                    "type_key": {"type": "string", "description": "Task type (e.g. 'bug', 'chore', 'feature')"},
                    "state_key": {"type": "string", "description": "Initial workflow state", "default": "open"},
                    "priority": {"type": "integer", "description": "Priority, higher is more urgent"},
                    "due_at": {"type": "string", "description": "Due date, RFC 3339 timestamp"}
                },
                "required": ["title", "project_id"]
            }),
        ),
        tool(
            "update_onto_task",
            "Update fields on an existing task. Only the fields you pass are changed.",
            json!({
                "type": "object",
                "properties": {
                    "task_id": {"type": "string", "description": "UUID of the task to update"},
                    "title": {"type": "string", "description": "New title"},
                    "description": {"type": "string", "description": "New description"},
                    "state_key": {"type": "string", "description": "New workflow state"},
                    "priority": {"type": "integer", "description": "New priority"},
                    "update_strategy": {
                        "type": "string",
                        "enum": ["merge", "replace"],
                        "description": "How to apply the change set",
                        "default": "merge"
                    }
                },
                "required": ["task_id"]
            }),
        ),
        tool(
            "delete_onto_task",
            "Delete a task permanently. This cannot be undone.",
            json!({
                "type": "object",
                "properties": {
                    "task_id": {"type": "string", "description": "UUID of the task to delete"}
                },
                "required": ["task_id"]
            }),
        ),
        // ===== Ontology: projects =====
        tool(
            "list_onto_projects",
            "List projects, optionally filtered by state. Returns newest first; page with limit and offset.",
            json!({
                "type": "object",
                "properties": {
                    "state_key": {"type": "string", "description": "Only projects in this state (e.g. 'active', 'archived')"},
                    "limit": {"type": "integer", "description": "Maximum projects to return", "default": 20},
                    "offset": {"type": "integer", "description": "Number of projects to skip", "default": 0}
                }
            }),
        ),
        tool(
            "get_onto_project_details",
            "Get one project by id, including its description and state.",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {"type": "string", "description": "UUID of the project"}
                },
                "required": ["project_id"]
            }),
        ),
        tool(
            "create_onto_project",
            "Create a new project. Only the name is required.",
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Project name"},
                    "description": {"type": "string", "description": "What the project is about"},
                    "type_key": {"type": "string", "description": "Project type (e.g. 'client', 'internal')"},
                    "state_key": {"type": "string", "description": "Initial state", "default": "active"}
                },
                "required": ["name"]
            }),
        ),
        tool(
            "update_onto_project",
            "Update fields on an existing project. Only the fields you pass are changed.",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {"type": "string", "description": "UUID of the project to update"},
                    "name": {"type": "string", "description": "New name"},
                    "description": {"type": "string", "description": "New description"},
                    "state_key": {"type": "string", "description": "New state"},
                    "update_strategy": {
                        "type": "string",
                        "enum": ["merge", "replace"],
                        "description": "How to apply the change set",
                        "default": "merge"
                    }
                },
                "required": ["project_id"]
            }),
        ),
        tool(
            "delete_onto_project",
            "Delete a project permanently. Tasks and documents in the project are left orphaned, not deleted.",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {"type": "string", "description": "UUID of the project to delete"}
                },
                "required": ["project_id"]
            }),
        ),
        // ===== Ontology: documents =====
        tool(
            "list_onto_documents",
            "List documents, optionally restricted to one project. Returns tree order; page with limit and offset.",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {"type": "string", "description": "Only documents in this project"},
                    "limit": {"type": "integer", "description": "Maximum documents to return", "default": 20},
                    "offset": {"type": "integer", "description": "Number of documents to skip", "default": 0}
                }
            }),
        ),
        tool(
            "get_onto_document_details",
            "Get one document by id. Content is omitted unless requested.",
            json!({
                "type": "object",
                "properties": {
                    "document_id": {"type": "string", "description": "UUID of the document"},
                    "include_content": {"type": "boolean", "description": "Include the full markdown body", "default": false}
                },
                "required": ["document_id"]
            }),
        ),
        tool(
            "create_onto_document",
            "Create a new document in a project, optionally nested under a parent document.",
            json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "Document title"},
                    "project_id": {"type": "string", "description": "UUID of the project the document belongs to"},
                    "body_markdown": {"type": "string", "description": "Document body, markdown"},
                    "parent_id": {"type": "string", "description": "UUID of the parent document, omit for a root document"},
                    "type_key": {"type": "string", "description": "Document type (e.g. 'note', 'spec', 'meeting')"}
                },
                "required": ["title", "project_id"]
            }),
        ),
        tool(
            "update_onto_document",
            "Update fields on an existing document. Only the fields you pass are changed.",
            json!({
                "type": "object",
                "properties": {
                    "document_id": {"type": "string", "description": "UUID of the document to update"},
                    "title": {"type": "string", "description": "New title"},
                    "body_markdown": {"type": "string", "description": "New markdown body"},
                    "state_key": {"type": "string", "description": "New state"},
                    "update_strategy": {
                        "type": "string",
                        "enum": ["merge", "replace"],
                        "description": "How to apply the change set",
                        "default": "merge"
                    }
                },
                "required": ["document_id"]
            }),
        ),
        tool(
            "delete_onto_document",
            "Delete a document permanently. Child documents are re-parented to the deleted document's parent.",
            json!({
                "type": "object",
                "properties": {
                    "document_id": {"type": "string", "description": "UUID of the document to delete"}
                },
                "required": ["document_id"]
            }),
        ),
        tool(
            "get_document_tree",
            "Get the nested document tree of a project. Returns titles and ids only, ordered by position.",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {"type": "string", "description": "UUID of the project"},
                    "max_depth": {"type": "integer", "description": "Maximum nesting depth to return", "default": 6}
                },
                "required": ["project_id"]
            }),
        ),
        tool(
            "move_document_node",
            "Move a document to a new position in its project's tree, optionally under a new parent. Pass null as new_parent_id to move the document to the root level.",
            json!({
                "type": "object",
                "properties": {
                    "document_id": {"type": "string", "description": "UUID of the document to move"},
                    "new_position": {"type": "integer", "description": "Zero-based position among the new siblings"},
                    "new_parent_id": {
                        "type": ["string", "null"],
                        "description": "UUID of the new parent document, or null for root level; omit to keep the current parent"
                    }
                },
                "required": ["document_id", "new_position"]
            }),
        ),
        // ===== Utility =====
        tool(
            "web_search",
            "Search the public web for current information. Use for anything outside the user's workspace.",
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search query"},
                    "max_results": {"type": "integer", "description": "Maximum results to return", "default": 5},
                    "recency": {
                        "type": "string",
                        "enum": ["day", "week", "month", "year"],
                        "description": "Restrict results to this recency window"
                    }
                },
                "required": ["query"]
            }),
        ),
        // ===== Calendar =====
        tool(
            "list_calendar_events",
            "List calendar events in a time window. Always pass an explicit time_min/time_max window; page with limit and offset.",
            json!({
                "type": "object",
                "properties": {
                    "time_min": {"type": "string", "description": "Window start, RFC 3339 timestamp"},
                    "time_max": {"type": "string", "description": "Window end, RFC 3339 timestamp"},
                    "calendar_id": {"type": "string", "description": "Only events from this calendar"},
                    "limit": {"type": "integer", "description": "Maximum events to return", "default": 50},
                    "offset": {"type": "integer", "description": "Number of events to skip", "default": 0}
                }
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names_unique() {
        let mut seen = std::collections::HashSet::new();
        for def in CATALOG.iter() {
            assert!(seen.insert(def.name.as_str()), "duplicate tool name {}", def.name);
        }
    }

    #[test]
    fn test_catalog_schemas_are_objects() {
        for def in CATALOG.iter() {
            assert!(!def.description.is_empty(), "{} needs a description", def.name);
            assert_eq!(
                def.parameters.get("type").and_then(|t| t.as_str()),
                Some("object"),
                "{} schema must be an object schema",
                def.name
            );
            assert!(
                def.parameters.get("properties").is_some(),
                "{} schema must declare properties",
                def.name
            );
        }
    }
}
