//! Schema-driven usage help.
//!
//! `get_help` never fails: every path resolves to a directory listing, a
//! per-op usage descriptor, or a `not_found` result. Per-op help is
//! synthesized purely from the op's parameter schema plus a handful of
//! rule tables keyed on the op's structured classification, so new catalog
//! tools get usable help without touching this module.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use std::collections::HashMap;

use crate::aliases::normalize_help_path;
use crate::registry::{OpAction, OpGroup, OpKind, RegistryOp, ToolRegistry};
use crate::schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelpFormat {
    #[default]
    Short,
    Full,
}

#[derive(Debug, Clone)]
pub struct HelpOptions {
    pub format: HelpFormat,
    pub include_examples: bool,
    pub include_schemas: bool,
}

impl Default for HelpOptions {
    fn default() -> Self {
        Self {
            format: HelpFormat::Short,
            include_examples: true,
            include_schemas: false,
        }
    }
}

/// Result of a help lookup. Serialized with a `type` tag so the agent
/// runtime can render it without knowing the variant up front.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HelpResult {
    Directory(DirectoryHelp),
    Op(OpHelp),
    NotFound { path: String, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectoryHelp {
    pub path: String,
    pub items: Vec<DirectoryItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_contract: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryItemKind {
    Op,
    Group,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectoryItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DirectoryItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArgHelp {
    pub name: String,
    #[serde(rename = "type")]
    pub type_label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExampleCall {
    pub op: String,
    pub args: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct HelpExample {
    pub label: String,
    /// Calls in execution order; multi-step examples show the discover →
    /// act sequence.
    pub calls: Vec<ExampleCall>,
}

/// Hand-maintained business guidance for ops whose correct use cannot be
/// derived from their schema.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyGuidance {
    #[serde(rename = "do")]
    pub dos: Vec<&'static str>,
    #[serde(rename = "dont")]
    pub donts: Vec<&'static str>,
    pub edge_cases: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpHelp {
    pub op: String,
    pub kind: OpKind,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub usage: String,
    pub args: Vec<ArgHelp>,
    pub required_args: Vec<String>,
    pub id_args: Vec<String>,
    pub notes: Vec<String>,
    pub example_tool_exec: ExampleCall,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<HelpExample>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyGuidance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters_schema: Option<Value>,
}

lazy_static! {
    static ref POLICY_MAP: HashMap<&'static str, PolicyGuidance> = {
        let mut map = HashMap::new();
        map.insert(
            "onto.task.create",
            PolicyGuidance {
                dos: vec![
                    "Create a task only when the user asks for a concrete action item.",
                    "Set project_id so the task lands in the project the user is talking about.",
                ],
                donts: vec![
                    "Don't create a task just to look helpful.",
                    "Don't create a duplicate; search existing tasks first.",
                ],
                edge_cases: vec![
                    "If the named project does not exist, ask the user before creating one.",
                ],
            },
        );
        map.insert(
            "onto.project.create",
            PolicyGuidance {
                dos: vec![
                    "Confirm the project name with the user before creating it.",
                ],
                donts: vec![
                    "Don't create a project as a side effect of creating a task.",
                ],
                edge_cases: vec![
                    "A project with a similar name may already exist; search_ontology first.",
                ],
            },
        );
        map
    };
}

/// Resolve a help path to a directory, an op descriptor, or `not_found`.
pub fn get_help(registry: &ToolRegistry, path: &str, options: &HelpOptions) -> HelpResult {
    let normalized = normalize_help_path(path);
    if normalized.is_empty() || normalized == "root" {
        return HelpResult::Directory(root_directory(registry, options));
    }
    if let Some(op) = registry.get(&normalized) {
        return HelpResult::Op(build_op_help(op, options));
    }
    let directory = build_directory(registry, &normalized, options);
    if directory.items.is_empty() {
        return HelpResult::NotFound {
            message: format!(
                "No op or group named `{normalized}`. Call tool_help(\"root\") to list the available groups."
            ),
            path: normalized,
        };
    }
    HelpResult::Directory(directory)
}

fn root_directory(registry: &ToolRegistry, options: &HelpOptions) -> DirectoryHelp {
    let mut groups: BTreeSet<&'static str> = BTreeSet::new();
    for op in registry.ops() {
        groups.insert(op.group.as_str());
    }
    let items = groups
        .into_iter()
        .map(|name| DirectoryItem {
            name: name.to_string(),
            kind: DirectoryItemKind::Group,
            summary: None,
        })
        .collect();

    let command_contract = json!({
        "tool_help": {
            "required": ["path"],
            "optional": ["format", "include_examples", "include_schemas"],
        },
        "tool_exec": {
            "required": ["op", "args"],
        },
        "rules": [
            "Never call tool_exec with empty args.",
            "Always pass exact UUIDs for id-addressed ops; never invent or truncate an id.",
        ],
    });

    let workflow = vec![
        "1. Discover: call tool_help(\"root\") or tool_help(\"onto\") to find ops.".to_string(),
        "2. Inspect: call tool_help(op) and read required_args and notes.".to_string(),
        "3. Execute: call tool_exec({ op, args }) with args matching the schema exactly."
            .to_string(),
        "4. On error: call tool_help(error.help_path), fix the args, and retry.".to_string(),
    ];

    let examples = options.include_examples.then(|| {
        vec![
            json!({"tool_help": {"path": "onto.task"}}),
            json!({"tool_exec": {"op": "onto.task.list", "args": {"limit": 20}}}),
        ]
    });

    DirectoryHelp {
        path: "root".to_string(),
        items,
        command_contract: Some(command_contract),
        workflow: Some(workflow),
        next_step: Some(
            "Call tool_help(\"onto\"), tool_help(\"util\"), or tool_help(\"cal\") to browse a group."
                .to_string(),
        ),
        examples,
    }
}

/// Directory of the immediate children under a namespace prefix.
fn build_directory(registry: &ToolRegistry, path: &str, options: &HelpOptions) -> DirectoryHelp {
    let prefix = format!("{path}.");
    let mut items: Vec<DirectoryItem> = Vec::new();
    let mut seen_groups: BTreeSet<String> = BTreeSet::new();

    for op in registry.ops() {
        let Some(remainder) = op.op.strip_prefix(&prefix) else {
            continue;
        };
        match remainder.split_once('.') {
            None => items.push(DirectoryItem {
                name: op.op.clone(),
                kind: DirectoryItemKind::Op,
                summary: Some(first_sentence(&op.description)),
            }),
            Some((segment, _)) => {
                let group_path = format!("{path}.{segment}");
                if seen_groups.insert(group_path.clone()) {
                    items.push(DirectoryItem {
                        name: group_path,
                        kind: DirectoryItemKind::Group,
                        summary: None,
                    });
                }
            }
        }
    }
    items.sort_by(|a, b| a.name.cmp(&b.name));

    let first_op = items
        .iter()
        .find(|item| item.kind == DirectoryItemKind::Op)
        .or_else(|| items.first());
    let next_step = first_op.map(|item| {
        format!(
            "Call tool_help(\"{}\") to inspect it before executing.",
            item.name
        )
    });
    let examples = match (options.include_examples, first_op) {
        (true, Some(item)) => Some(vec![json!({"tool_help": {"path": item.name}})]),
        _ => None,
    };

    DirectoryHelp {
        path: path.to_string(),
        items,
        command_contract: None,
        workflow: None,
        next_step,
        examples,
    }
}

fn build_op_help(op: &RegistryOp, options: &HelpOptions) -> OpHelp {
    let props = schema::properties(&op.parameters_schema);
    let required = schema::required(&op.parameters_schema);

    let args: Vec<ArgHelp> = props
        .iter()
        .map(|(name, prop)| ArgHelp {
            name: name.clone(),
            type_label: schema::type_label(prop),
            required: required.iter().any(|r| r == name),
            default: prop.get("default").cloned(),
            description: prop
                .get("description")
                .and_then(|d| d.as_str())
                .map(str::to_string),
        })
        .collect();

    let id_args: Vec<String> = props
        .keys()
        .filter(|name| name.ends_with("_id"))
        .cloned()
        .collect();

    let minimal_args = build_minimal_args(op, &props, &required);
    let example_tool_exec = ExampleCall {
        op: op.op.clone(),
        args: Value::Object(minimal_args),
    };

    let examples = options
        .include_examples
        .then(|| build_op_examples(op, &props, &example_tool_exec));

    OpHelp {
        op: op.op.clone(),
        kind: op.kind,
        summary: first_sentence(&op.description),
        description: match options.format {
            HelpFormat::Full => Some(op.description.clone()),
            HelpFormat::Short => None,
        },
        usage: format!("tool_exec({{ op: \"{}\", args: {{ ... }} }})", op.op),
        args,
        required_args: required,
        id_args,
        notes: build_op_notes(op, &props),
        example_tool_exec,
        examples,
        policy: POLICY_MAP.get(op.op.as_str()).cloned(),
        parameters_schema: options
            .include_schemas
            .then(|| op.parameters_schema.clone()),
    }
}

/// Text up to and including the first period, or the whole trimmed string.
fn first_sentence(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.find('.') {
        Some(idx) => trimmed[..=idx].to_string(),
        None => trimmed.to_string(),
    }
}

/// True for ops that take a free-text query: `onto.search` and every
/// `onto.<entity>.search`.
fn is_search_op(op: &RegistryOp) -> bool {
    op.op == "onto.search"
        || (op.group == OpGroup::Onto
            && op.segment_count() == 3
            && op.action == Some(OpAction::Search))
}

/// True when the op addresses one entity by `<entity>_id` and the schema
/// actually declares that property.
fn entity_id_arg(op: &RegistryOp, props: &Map<String, Value>) -> Option<String> {
    if op.group != OpGroup::Onto || op.segment_count() != 3 {
        return None;
    }
    let entity = op.entity.as_deref()?;
    let id_arg = format!("{entity}_id");
    props.contains_key(&id_arg).then_some(id_arg)
}

fn build_op_notes(op: &RegistryOp, props: &Map<String, Value>) -> Vec<String> {
    let mut notes = Vec::new();

    if op.op == "cal.event.list" {
        notes.push(
            "Prefer an explicit time_min/time_max window; open-ended listings return only the nearest events.".to_string(),
        );
        notes.push(
            "Page through large windows with limit and offset instead of raising limit.".to_string(),
        );
    }

    if op.op == "onto.document.tree.move" {
        notes.push(
            "Requires document_id and new_position; pass new_parent_id only when re-parenting (null moves the document to the root level).".to_string(),
        );
    }

    if op.group == OpGroup::Onto && op.segment_count() == 3 {
        match (&op.entity, &op.action) {
            (Some(entity), Some(OpAction::Update)) => {
                let id_arg = format!("{entity}_id");
                if props.contains_key(&id_arg) {
                    notes.push(format!(
                        "Pass {id_arg} to address the {entity}; include only the fields you intend to change."
                    ));
                }
            }
            (Some(entity), Some(OpAction::Get | OpAction::Delete)) => {
                notes.push(format!(
                    "{entity}_id is required and must be the exact UUID of the {entity}."
                ));
            }
            _ => {}
        }
    }

    if is_search_op(op) {
        notes.push("args.query is required; results are ranked by relevance.".to_string());
    }

    if notes.is_empty() {
        notes.push(
            "Match args exactly to the schema; do not pass fields the schema does not define."
                .to_string(),
        );
    }
    notes
}

/// Minimal example args: one placeholder per required property, plus the
/// op-specific supplements that make the example demonstrative.
fn build_minimal_args(
    op: &RegistryOp,
    props: &Map<String, Value>,
    required: &[String],
) -> Map<String, Value> {
    let mut args = Map::new();
    for name in required {
        if let Some(prop) = props.get(name) {
            args.insert(name.clone(), schema::placeholder_value(name, prop));
        }
    }

    // Update examples should show a field actually being changed, not just
    // the identifier.
    if op.group == OpGroup::Onto
        && op.segment_count() == 3
        && op.action == Some(OpAction::Update)
    {
        let mutable = props
            .iter()
            .find(|(name, _)| {
                !name.ends_with("_id")
                    && !name.contains("strategy")
                    && !args.contains_key(name.as_str())
            })
            .map(|(name, prop)| (name.clone(), schema::placeholder_value(name, prop)));
        if let Some((name, value)) = mutable {
            args.insert(name, value);
        }
    }

    if is_search_op(op) && !args.contains_key("query") {
        args.insert("query".to_string(), json!("<search query>"));
    }

    args
}

fn build_op_examples(
    op: &RegistryOp,
    props: &Map<String, Value>,
    minimal_call: &ExampleCall,
) -> Vec<HelpExample> {
    // Calendar listing gets two literal window examples; the generic
    // minimal-call example is not useful for a tool whose whole point is
    // the time window.
    if op.op == "cal.event.list" {
        return vec![
            HelpExample {
                label: "Events in an explicit week window".to_string(),
                calls: vec![ExampleCall {
                    op: op.op.clone(),
                    args: json!({
                        "time_min": "2025-03-03T00:00:00Z",
                        "time_max": "2025-03-10T00:00:00Z",
                        "limit": 50,
                    }),
                }],
            },
            HelpExample {
                label: "Next page of the same window".to_string(),
                calls: vec![ExampleCall {
                    op: op.op.clone(),
                    args: json!({
                        "time_min": "2025-03-03T00:00:00Z",
                        "time_max": "2025-03-10T00:00:00Z",
                        "limit": 50,
                        "offset": 50,
                    }),
                }],
            },
        ];
    }

    let mut examples = vec![HelpExample {
        label: "Minimal valid call".to_string(),
        calls: vec![minimal_call.clone()],
    }];

    // Id-addressed ops get a discover-then-act sequence: list first, then
    // call the op with the discovered id.
    if matches!(
        op.action,
        Some(OpAction::Get | OpAction::Update | OpAction::Delete)
    ) {
        if let (Some(entity), Some(_)) = (op.entity.as_deref(), entity_id_arg(op, props)) {
            examples.push(HelpExample {
                label: "Discover then act".to_string(),
                calls: vec![
                    ExampleCall {
                        op: format!("onto.{entity}.list"),
                        args: json!({"project_id": "<project_id_uuid>", "limit": 20}),
                    },
                    minimal_call.clone(),
                ],
            });
        }
    }

    examples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sentence() {
        assert_eq!(first_sentence("One. Two."), "One.");
        assert_eq!(first_sentence("  no terminator here  "), "no terminator here");
        assert_eq!(first_sentence(""), "");
    }

    #[test]
    fn test_policy_map_targets_exist_in_catalog() {
        let registry =
            crate::registry::build_registry(&crate::catalog::CATALOG, &crate::tool_metadata::TOOL_METADATA)
                .unwrap();
        for op in POLICY_MAP.keys() {
            assert!(
                registry.get(op).is_some(),
                "policy entry {} points at a missing op",
                op
            );
        }
    }
}
