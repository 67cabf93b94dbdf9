//! Tests for the schema-driven help generator.

use onto_gateway::help::{DirectoryItemKind, HelpResult};
use onto_gateway::{
    build_registry, get_help, HelpFormat, HelpOptions, ToolRegistry, CATALOG, TOOL_METADATA,
};
use serde_json::json;

fn registry() -> ToolRegistry {
    build_registry(&CATALOG, &TOOL_METADATA).unwrap()
}

fn full_options() -> HelpOptions {
    HelpOptions {
        format: HelpFormat::Full,
        include_examples: true,
        include_schemas: true,
    }
}

#[test]
fn test_root_help_directory_and_contract() {
    let registry = registry();
    let result = get_help(&registry, "root", &HelpOptions::default());
    let HelpResult::Directory(dir) = result else {
        panic!("root help must be a directory");
    };
    assert_eq!(dir.path, "root");

    let names: Vec<&str> = dir.items.iter().map(|i| i.name.as_str()).collect();
    assert!(names.contains(&"onto"));
    assert!(names.contains(&"util"));
    assert!(names.contains(&"cal"));

    let contract = dir.command_contract.expect("root carries the command contract");
    assert_eq!(contract["tool_exec"]["required"], json!(["op", "args"]));
    assert_eq!(contract["tool_help"]["required"], json!(["path"]));

    let workflow = dir.workflow.expect("root carries the workflow");
    assert_eq!(workflow.len(), 4);
    assert!(workflow[3].contains("error.help_path"));

    let examples = dir.examples.expect("examples on by default");
    assert_eq!(examples.len(), 2);
}

#[test]
fn test_empty_path_is_root() {
    let registry = registry();
    let HelpResult::Directory(dir) = get_help(&registry, "", &HelpOptions::default()) else {
        panic!("empty path must resolve to the root directory");
    };
    assert_eq!(dir.path, "root");
}

#[test]
fn test_task_update_help() {
    let registry = registry();
    let result = get_help(&registry, "onto.task.update", &full_options());
    let HelpResult::Op(help) = result else {
        panic!("onto.task.update must resolve to op help");
    };

    assert_eq!(help.op, "onto.task.update");
    assert!(help.required_args.contains(&"task_id".to_string()));
    assert!(help.id_args.contains(&"task_id".to_string()));
    assert!(
        help.notes.iter().any(|n| n.contains("task_id")),
        "notes must name the id argument: {:?}",
        help.notes
    );

    let args = help.example_tool_exec.args.as_object().unwrap();
    assert_eq!(args["task_id"], json!("<task_id_uuid>"));
    assert!(
        args.len() > 1,
        "update example must change a field, not just name the id: {args:?}"
    );
    // The demonstrated field is a real mutable property, not the strategy.
    assert!(args.keys().all(|k| !k.contains("strategy")));

    assert!(help.description.is_some(), "full format includes description");
    assert!(help.parameters_schema.is_some(), "include_schemas attaches schema");
    assert!(help.usage.contains("tool_exec({ op: \"onto.task.update\""));
}

#[test]
fn test_short_format_omits_description_and_schema() {
    let registry = registry();
    let HelpResult::Op(help) = get_help(&registry, "onto.task.update", &HelpOptions::default())
    else {
        panic!("expected op help");
    };
    assert!(help.description.is_none());
    assert!(help.parameters_schema.is_none());
}

#[test]
fn test_task_search_help() {
    let registry = registry();
    let HelpResult::Op(help) = get_help(&registry, "onto.task.search", &HelpOptions::default())
    else {
        panic!("expected op help");
    };
    assert_eq!(help.example_tool_exec.args["query"], json!("<search query>"));
    assert!(
        help.notes.iter().any(|n| n.contains("args.query")),
        "search notes must mention args.query: {:?}",
        help.notes
    );
}

#[test]
fn test_ontology_search_gets_query_note_too() {
    let registry = registry();
    let HelpResult::Op(help) = get_help(&registry, "onto.search", &HelpOptions::default()) else {
        panic!("expected op help");
    };
    assert!(help.notes.iter().any(|n| n.contains("args.query")));
    assert_eq!(help.example_tool_exec.args["query"], json!("<search query>"));
}

#[test]
fn test_discover_then_act_example() {
    let registry = registry();
    let HelpResult::Op(help) = get_help(&registry, "onto.task.get", &HelpOptions::default())
    else {
        panic!("expected op help");
    };
    let examples = help.examples.expect("examples requested");
    assert_eq!(examples[0].label, "Minimal valid call");
    let sequence = examples
        .iter()
        .find(|e| e.label == "Discover then act")
        .expect("id-addressed op gets a discovery sequence");
    assert_eq!(sequence.calls.len(), 2);
    assert_eq!(sequence.calls[0].op, "onto.task.list");
    assert_eq!(
        sequence.calls[0].args,
        json!({"project_id": "<project_id_uuid>", "limit": 20})
    );
    assert_eq!(sequence.calls[1].op, "onto.task.get");
    assert_eq!(sequence.calls[1].args["task_id"], json!("<task_id_uuid>"));
}

#[test]
fn test_calendar_list_help_is_special_cased() {
    let registry = registry();
    let HelpResult::Op(help) = get_help(&registry, "cal.event.list", &HelpOptions::default())
    else {
        panic!("expected op help");
    };
    assert!(help.notes.len() >= 2);
    assert!(help.notes[0].contains("time_min"));
    assert!(help.notes[1].contains("offset"));

    let examples = help.examples.expect("examples requested");
    assert_eq!(examples.len(), 2, "calendar gets exactly the two window examples");
    for example in &examples {
        let args = example.calls[0].args.as_object().unwrap();
        assert!(args.contains_key("time_min"));
        assert!(args.contains_key("time_max"));
    }
    assert_eq!(examples[1].calls[0].args["offset"], json!(50));
}

#[test]
fn test_document_tree_move_note() {
    let registry = registry();
    let HelpResult::Op(help) =
        get_help(&registry, "onto.document.tree.move", &HelpOptions::default())
    else {
        panic!("expected op help");
    };
    assert!(help
        .notes
        .iter()
        .any(|n| n.contains("new_position") && n.contains("new_parent_id")));
    // The union-typed parent arg renders as a joined label.
    let parent = help.args.iter().find(|a| a.name == "new_parent_id").unwrap();
    assert_eq!(parent.type_label, "string | null");
}

#[test]
fn test_directory_listing_for_group() {
    let registry = registry();
    let HelpResult::Directory(dir) = get_help(&registry, "onto.task", &HelpOptions::default())
    else {
        panic!("expected a directory for onto.task");
    };
    assert_eq!(dir.path, "onto.task");
    let names: Vec<&str> = dir.items.iter().map(|i| i.name.as_str()).collect();
    for op in [
        "onto.task.create",
        "onto.task.delete",
        "onto.task.get",
        "onto.task.list",
        "onto.task.search",
        "onto.task.update",
    ] {
        assert!(names.contains(&op), "missing {op} in {names:?}");
    }
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted, "directory items must be sorted");
    assert!(dir.items.iter().all(|i| i.kind == DirectoryItemKind::Op));
    assert!(dir.next_step.unwrap().contains("onto.task.create"));
}

#[test]
fn test_directory_mixes_ops_and_groups() {
    let registry = registry();
    let HelpResult::Directory(dir) = get_help(&registry, "onto", &HelpOptions::default()) else {
        panic!("expected a directory for onto");
    };
    let find = |name: &str| dir.items.iter().find(|i| i.name == name);
    assert_eq!(find("onto.search").unwrap().kind, DirectoryItemKind::Op);
    assert_eq!(find("onto.task").unwrap().kind, DirectoryItemKind::Group);
    assert_eq!(find("onto.document").unwrap().kind, DirectoryItemKind::Group);
    assert!(find("onto.search").unwrap().summary.is_some());
}

#[test]
fn test_round_trip_discoverability() {
    let registry = registry();
    let options = HelpOptions::default();
    for op in registry.ops() {
        match get_help(&registry, &op.op, &options) {
            HelpResult::Op(help) => assert_eq!(help.op, op.op),
            other => panic!("op {} did not resolve to op help: {other:?}", op.op),
        }
        let prefix = op.op.rsplit_once('.').unwrap().0;
        match get_help(&registry, prefix, &options) {
            HelpResult::Directory(dir) => assert!(
                dir.items.iter().any(|i| i.name == op.op),
                "{} missing from directory {}",
                op.op,
                prefix
            ),
            other => panic!("prefix {prefix} did not resolve to a directory: {other:?}"),
        }
    }
}

#[test]
fn test_not_found() {
    let registry = registry();
    let result = get_help(&registry, "onto.nonexistent_entity", &HelpOptions::default());
    let HelpResult::NotFound { path, message } = result else {
        panic!("expected not_found");
    };
    assert_eq!(path, "onto.nonexistent_entity");
    assert!(message.contains("root"));
}

#[test]
fn test_policy_attached_to_task_create() {
    let registry = registry();
    let HelpResult::Op(help) = get_help(&registry, "onto.task.create", &HelpOptions::default())
    else {
        panic!("expected op help");
    };
    let policy = help.policy.expect("task creation carries policy guidance");
    assert!(!policy.dos.is_empty());
    assert!(!policy.donts.is_empty());

    // Most ops carry none.
    let HelpResult::Op(list_help) = get_help(&registry, "onto.task.list", &HelpOptions::default())
    else {
        panic!("expected op help");
    };
    assert!(list_help.policy.is_none());
}

#[test]
fn test_legacy_paths_resolve_through_aliases() {
    let registry = registry();
    let HelpResult::Op(help) = get_help(
        &registry,
        "onto_projects.get_document_tree",
        &HelpOptions::default(),
    ) else {
        panic!("legacy op path must resolve");
    };
    assert_eq!(help.op, "onto.document.tree.get");

    let HelpResult::Directory(dir) = get_help(
        &registry,
        "onto_projects.doc_structure",
        &HelpOptions::default(),
    ) else {
        panic!("legacy prefix must resolve to a directory");
    };
    assert_eq!(dir.path, "onto.document.tree");
}

#[test]
fn test_help_results_serialize_with_type_tag() {
    let registry = registry();
    let root = serde_json::to_value(get_help(&registry, "root", &HelpOptions::default())).unwrap();
    assert_eq!(root["type"], json!("directory"));
    let op =
        serde_json::to_value(get_help(&registry, "onto.task.list", &HelpOptions::default()))
            .unwrap();
    assert_eq!(op["type"], json!("op"));
    let missing =
        serde_json::to_value(get_help(&registry, "nope", &HelpOptions::default())).unwrap();
    assert_eq!(missing["type"], json!("not_found"));
}
