//! Tests for legacy op and help-path normalization.

use onto_gateway::{build_registry, normalize_help_path, normalize_op, CATALOG, TOOL_METADATA};

#[test]
fn test_legacy_link_alias() {
    assert_eq!(
        normalize_op("onto_projects.link_onto_entities"),
        "onto.edge.link"
    );
}

#[test]
fn test_underscore_and_dot_variants_agree() {
    assert_eq!(
        normalize_op("onto_projects_get_document_tree"),
        normalize_op("onto_projects.get_document_tree")
    );
    assert_eq!(
        normalize_op("onto_projects_unlink_onto_entities"),
        "onto.edge.unlink"
    );
}

#[test]
fn test_normalization_is_idempotent() {
    let inputs = [
        "onto_projects.link_onto_entities",
        "onto_projects_get_document_tree",
        "onto_projects.doc_structure",
        "calendar.list_events",
        "onto.task.list",
        "not.an.op",
        "",
        "  padded  ",
    ];
    for input in inputs {
        let once = normalize_op(input);
        assert_eq!(normalize_op(&once), once, "op alias chain from {input:?}");
        let once = normalize_help_path(input);
        assert_eq!(
            normalize_help_path(&once),
            once,
            "help path alias chain from {input:?}"
        );
    }
}

#[test]
fn test_op_aliases_resolve_to_registered_ops() {
    // Every alias target must be a real op in the shipped registry,
    // otherwise the alias points into the void.
    let registry = build_registry(&CATALOG, &TOOL_METADATA).unwrap();
    for legacy in [
        "onto_projects.link_onto_entities",
        "onto_projects.unlink_onto_entities",
        "onto_projects.get_document_tree",
        "onto_projects.move_document_node",
        "onto_projects.search_ontology",
        "onto_projects.list_tasks",
        "onto_projects.create_task",
        "calendar.list_events",
        "util.search",
    ] {
        let canonical = normalize_op(legacy);
        assert!(
            registry.get(&canonical).is_some(),
            "alias {legacy} resolves to unregistered op {canonical}"
        );
    }
}

#[test]
fn test_help_path_aliases() {
    assert_eq!(
        normalize_help_path("onto_projects.doc_structure"),
        "onto.document.tree"
    );
    assert_eq!(normalize_help_path("onto_projects"), "onto");
    assert_eq!(normalize_help_path("calendar"), "cal");
    // Falls through to the op table for paths that name a single op.
    assert_eq!(
        normalize_help_path("onto_projects.get_document_tree"),
        "onto.document.tree.get"
    );
}

#[test]
fn test_empty_and_unknown_paths_unchanged() {
    assert_eq!(normalize_op(""), "");
    assert_eq!(normalize_help_path("   "), "");
    assert_eq!(normalize_op("onto.task.get"), "onto.task.get");
    assert_eq!(normalize_help_path("made.up.path"), "made.up.path");
}
