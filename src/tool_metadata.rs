//! Per-tool metadata: category, capabilities, and context visibility.
//!
//! Metadata never affects op naming. The registry uses `category` to
//! classify an op as read or write and copies `contexts` through so the
//! runtime can scope which tools a given surface (chat, workspace panel,
//! background automation) is allowed to see.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Search,
    Read,
    Write,
    Utility,
}

/// Surfaces a tool may be offered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextScope {
    Chat,
    Workspace,
    Automation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolMetadata {
    /// One-line summary for directory listings.
    pub summary: &'static str,
    /// Capability tags for discoverability.
    pub capabilities: &'static [&'static str],
    /// Surfaces this tool is visible on.
    pub contexts: &'static [ContextScope],
    pub category: ToolCategory,
}

impl ToolMetadata {
    pub fn is_visible_in(&self, scope: ContextScope) -> bool {
        self.contexts.contains(&scope)
    }
}

use ContextScope::{Automation, Chat, Workspace};

const ALL_CONTEXTS: &[ContextScope] = &[Chat, Workspace, Automation];
const INTERACTIVE: &[ContextScope] = &[Chat, Workspace];

lazy_static! {
    /// Static metadata registry, keyed by tool name. Every catalog entry
    /// must have a row here; the registry test enforces it.
    pub static ref TOOL_METADATA: HashMap<&'static str, ToolMetadata> = {
        let mut map = HashMap::new();

        map.insert("search_ontology", ToolMetadata {
            summary: "Free-text search across tasks, projects, and documents",
            capabilities: &["search", "ontology", "discovery"],
            contexts: ALL_CONTEXTS,
            category: ToolCategory::Search,
        });
        map.insert("link_onto_entities", ToolMetadata {
            summary: "Create a typed edge between two entities",
            capabilities: &["ontology", "edges", "relations"],
            contexts: INTERACTIVE,
            category: ToolCategory::Write,
        });
        map.insert("unlink_onto_entities", ToolMetadata {
            summary: "Remove an edge between two entities",
            capabilities: &["ontology", "edges", "relations"],
            contexts: INTERACTIVE,
            category: ToolCategory::Write,
        });

        map.insert("list_onto_tasks", ToolMetadata {
            summary: "List tasks with project and state filters",
            capabilities: &["tasks", "list", "paging"],
            contexts: ALL_CONTEXTS,
            category: ToolCategory::Read,
        });
        map.insert("search_onto_tasks", ToolMetadata {
            summary: "Free-text search over task titles and descriptions",
            capabilities: &["tasks", "search"],
            contexts: ALL_CONTEXTS,
            category: ToolCategory::Search,
        });
        map.insert("get_onto_task_details", ToolMetadata {
            summary: "Fetch one task by id",
            capabilities: &["tasks", "read"],
            contexts: ALL_CONTEXTS,
            category: ToolCategory::Read,
        });
        map.insert("create_onto_task", ToolMetadata {
            summary: "Create a task in a project",
            capabilities: &["tasks", "create"],
            contexts: INTERACTIVE,
            category: ToolCategory::Write,
        });
        map.insert("update_onto_task", ToolMetadata {
            summary: "Change fields on an existing task",
            capabilities: &["tasks", "update"],
            contexts: INTERACTIVE,
            category: ToolCategory::Write,
        });
        map.insert("delete_onto_task", ToolMetadata {
            summary: "Delete a task permanently",
            capabilities: &["tasks", "delete"],
            contexts: INTERACTIVE,
            category: ToolCategory::Write,
        });

        map.insert("list_onto_projects", ToolMetadata {
            summary: "List projects with state filters",
            capabilities: &["projects", "list", "paging"],
            contexts: ALL_CONTEXTS,
            category: ToolCategory::Read,
        });
        map.insert("get_onto_project_details", ToolMetadata {
            summary: "Fetch one project by id",
            capabilities: &["projects", "read"],
            contexts: ALL_CONTEXTS,
            category: ToolCategory::Read,
        });
        map.insert("create_onto_project", ToolMetadata {
            summary: "Create a project",
            capabilities: &["projects", "create"],
            contexts: INTERACTIVE,
            category: ToolCategory::Write,
        });
        map.insert("update_onto_project", ToolMetadata {
            summary: "Change fields on an existing project",
            capabilities: &["projects", "update"],
            contexts: INTERACTIVE,
            category: ToolCategory::Write,
        });
        map.insert("delete_onto_project", ToolMetadata {
            summary: "Delete a project permanently",
            capabilities: &["projects", "delete"],
            contexts: INTERACTIVE,
            category: ToolCategory::Write,
        });

        map.insert("list_onto_documents", ToolMetadata {
            summary: "List documents, optionally per project",
            capabilities: &["documents", "list", "paging"],
            contexts: ALL_CONTEXTS,
            category: ToolCategory::Read,
        });
        map.insert("get_onto_document_details", ToolMetadata {
            summary: "Fetch one document by id",
            capabilities: &["documents", "read"],
            contexts: ALL_CONTEXTS,
            category: ToolCategory::Read,
        });
        map.insert("create_onto_document", ToolMetadata {
            summary: "Create a document in a project",
            capabilities: &["documents", "create"],
            contexts: INTERACTIVE,
            category: ToolCategory::Write,
        });
        map.insert("update_onto_document", ToolMetadata {
            summary: "Change fields on an existing document",
            capabilities: &["documents", "update"],
            contexts: INTERACTIVE,
            category: ToolCategory::Write,
        });
        map.insert("delete_onto_document", ToolMetadata {
            summary: "Delete a document permanently",
            capabilities: &["documents", "delete"],
            contexts: INTERACTIVE,
            category: ToolCategory::Write,
        });
        map.insert("get_document_tree", ToolMetadata {
            summary: "Nested document tree of a project",
            capabilities: &["documents", "tree", "read"],
            contexts: ALL_CONTEXTS,
            category: ToolCategory::Read,
        });
        map.insert("move_document_node", ToolMetadata {
            summary: "Move a document within its project tree",
            capabilities: &["documents", "tree", "reorganize"],
            contexts: INTERACTIVE,
            category: ToolCategory::Write,
        });

        map.insert("web_search", ToolMetadata {
            summary: "Search the public web",
            capabilities: &["web", "search", "external"],
            contexts: ALL_CONTEXTS,
            category: ToolCategory::Utility,
        });

        map.insert("list_calendar_events", ToolMetadata {
            summary: "List calendar events in a time window",
            capabilities: &["calendar", "events", "list"],
            contexts: ALL_CONTEXTS,
            category: ToolCategory::Read,
        });

        map
    };
}

/// Tool names visible in the given context scope, sorted for stable output.
pub fn visible_tools(scope: ContextScope) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = TOOL_METADATA
        .iter()
        .filter(|(_, meta)| meta.is_visible_in(scope))
        .map(|(name, _)| *name)
        .collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;

    #[test]
    fn test_every_tool_has_metadata() {
        for def in CATALOG.iter() {
            assert!(
                TOOL_METADATA.contains_key(def.name.as_str()),
                "tool {} is missing a metadata row",
                def.name
            );
        }
        assert_eq!(
            TOOL_METADATA.len(),
            CATALOG.len(),
            "metadata rows without a catalog entry"
        );
    }

    #[test]
    fn test_write_tools_not_visible_to_automation() {
        for (name, meta) in TOOL_METADATA.iter() {
            if meta.category == ToolCategory::Write {
                assert!(
                    !meta.is_visible_in(ContextScope::Automation),
                    "write tool {} should not run unattended",
                    name
                );
            }
        }
    }

    #[test]
    fn test_visible_tools_sorted() {
        let names = visible_tools(ContextScope::Chat);
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.contains(&"list_onto_tasks"));
    }
}
