//! Legacy op spellings, normalized to canonical names.
//!
//! Agents and saved prompts from earlier deployments address ops by their
//! historical names (underscore-joined, or under the old `onto_projects`
//! namespace). These tables keep that vocabulary working without touching
//! callers. Alias values are always canonical, never another alias, so
//! normalization is a single lookup and idempotent by construction.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Legacy op spelling → canonical op.
    static ref OP_ALIASES: HashMap<&'static str, &'static str> = [
        // Underscore-joined legacy names.
        ("onto_projects_get_document_tree", "onto.document.tree.get"),
        ("onto_projects_move_document_node", "onto.document.tree.move"),
        ("onto_projects_link_onto_entities", "onto.edge.link"),
        ("onto_projects_unlink_onto_entities", "onto.edge.unlink"),
        ("onto_projects_search_ontology", "onto.search"),
        // Dot-joined legacy variants under the old namespace.
        ("onto_projects.get_document_tree", "onto.document.tree.get"),
        ("onto_projects.move_document_node", "onto.document.tree.move"),
        ("onto_projects.link_onto_entities", "onto.edge.link"),
        ("onto_projects.unlink_onto_entities", "onto.edge.unlink"),
        ("onto_projects.search_ontology", "onto.search"),
        ("onto_projects.list_tasks", "onto.task.list"),
        ("onto_projects.create_task", "onto.task.create"),
        // Pre-split calendar and utility namespaces.
        ("calendar.list_events", "cal.event.list"),
        ("util.search", "util.web.search"),
    ]
    .into_iter()
    .collect();

    /// Legacy namespace prefix → canonical prefix, for help paths that do
    /// not name a single op.
    static ref HELP_PATH_ALIASES: HashMap<&'static str, &'static str> = [
        ("onto_projects.doc_structure", "onto.document.tree"),
        ("onto_projects.docs", "onto.document"),
        ("onto_projects", "onto"),
        ("calendar", "cal"),
    ]
    .into_iter()
    .collect();
}

/// Rewrite a legacy op spelling to its canonical name. Unknown input is
/// returned trimmed but otherwise unchanged; empty input stays empty.
pub fn normalize_op(op: &str) -> String {
    let trimmed = op.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    OP_ALIASES
        .get(trimmed)
        .map(|canonical| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Rewrite a legacy help path. Prefix aliases are checked before op
/// aliases, since a path like `onto_projects` names a namespace, not an op.
pub fn normalize_help_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if let Some(canonical) = HELP_PATH_ALIASES.get(trimmed) {
        return (*canonical).to_string();
    }
    normalize_op(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_op_known_aliases() {
        assert_eq!(
            normalize_op("onto_projects.link_onto_entities"),
            "onto.edge.link"
        );
        assert_eq!(
            normalize_op("onto_projects_get_document_tree"),
            "onto.document.tree.get"
        );
        assert_eq!(normalize_op("calendar.list_events"), "cal.event.list");
    }

    #[test]
    fn test_normalize_op_passthrough_and_trim() {
        assert_eq!(normalize_op("onto.task.list"), "onto.task.list");
        assert_eq!(normalize_op("  onto.task.list \n"), "onto.task.list");
        assert_eq!(normalize_op(""), "");
        assert_eq!(normalize_op("   "), "");
    }

    #[test]
    fn test_help_path_prefix_wins_over_op_table() {
        assert_eq!(
            normalize_help_path("onto_projects.doc_structure"),
            "onto.document.tree"
        );
        assert_eq!(normalize_help_path("onto_projects"), "onto");
        // Falls back to the op table when no prefix alias matches.
        assert_eq!(
            normalize_help_path("onto_projects.search_ontology"),
            "onto.search"
        );
    }

    #[test]
    fn test_aliases_are_idempotent() {
        for target in OP_ALIASES.values() {
            assert_eq!(normalize_op(target), *target, "alias chain via {}", target);
        }
        for target in HELP_PATH_ALIASES.values() {
            assert_eq!(
                normalize_help_path(target),
                *target,
                "path alias chain via {}",
                target
            );
        }
    }
}
