//! Op registry: derives the dotted op namespace from tool names and builds
//! the immutable op index the help generator and gateway run against.
//!
//! Derivation is deterministic: exception tables first, then the regular
//! `verb_entity` pattern, then a `x.misc.*` fallback so every tool is
//! always addressable. The whole registry carries a content-hash version so
//! downstream caches can detect that the tool surface changed without
//! diffing the catalog.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{ToolDefinition, CATALOG};
use crate::tool_metadata::{ContextScope, ToolCategory, ToolMetadata, TOOL_METADATA};

/// Leading namespace segment of an op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpGroup {
    Onto,
    Util,
    Cal,
    /// Catch-all for tools whose name fits no convention.
    X,
}

impl OpGroup {
    fn from_leading_segment(segment: &str) -> Self {
        match segment {
            "onto" => Self::Onto,
            "util" => Self::Util,
            "cal" => Self::Cal,
            _ => Self::X,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onto => "onto",
            Self::Util => "util",
            Self::Cal => "cal",
            Self::X => "x",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Read,
    Write,
}

/// Trailing action segment of an op, parsed once at build time so help
/// generation can match on it instead of re-running string patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpAction {
    List,
    Search,
    Get,
    Create,
    Update,
    Delete,
    Move,
    Link,
    Unlink,
    #[serde(untagged)]
    Other(String),
}

impl OpAction {
    fn parse(segment: &str) -> Self {
        match segment {
            "list" => Self::List,
            "search" => Self::Search,
            "get" => Self::Get,
            "create" => Self::Create,
            "update" => Self::Update,
            "delete" => Self::Delete,
            "move" => Self::Move,
            "link" => Self::Link,
            "unlink" => Self::Unlink,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One registered op, derived from exactly one tool definition.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryOp {
    /// Canonical dotted op name, globally unique.
    pub op: String,
    /// Back-reference into the tool catalog.
    pub tool_name: String,
    pub description: String,
    pub parameters_schema: Value,
    pub group: OpGroup,
    pub kind: OpKind,
    /// Entity segment, only for `onto`/`cal` ops with at least 3 segments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Action segment, same condition as `entity`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<OpAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Vec<ContextScope>>,
}

impl RegistryOp {
    /// Number of dotted segments in the op name.
    pub fn segment_count(&self) -> usize {
        self.op.split('.').count()
    }
}

/// Immutable op index. Built once per process from the static catalog and
/// metadata tables; cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct ToolRegistry {
    pub version: String,
    ops: BTreeMap<String, RegistryOp>,
    by_tool_name: HashMap<String, String>,
}

impl ToolRegistry {
    pub fn get(&self, op: &str) -> Option<&RegistryOp> {
        self.ops.get(op)
    }

    pub fn get_by_tool_name(&self, tool_name: &str) -> Option<&RegistryOp> {
        self.by_tool_name
            .get(tool_name)
            .and_then(|op| self.ops.get(op))
    }

    /// All ops in canonical (lexicographic) order.
    pub fn ops(&self) -> impl Iterator<Item = &RegistryOp> {
        self.ops.values()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two tool names derived the same op. The build fails loudly rather
    /// than silently letting the later tool shadow the earlier one.
    #[error("duplicate op `{op}` derived from tools `{first}` and `{second}`")]
    DuplicateOp {
        op: String,
        first: String,
        second: String,
    },
}

lazy_static! {
    /// Irregular ontology tool names that bypass the verb_entity pattern.
    static ref GENERAL_EXCEPTIONS: HashMap<&'static str, &'static str> = [
        ("search_ontology", "onto.search"),
        ("get_document_tree", "onto.document.tree.get"),
        ("move_document_node", "onto.document.tree.move"),
        ("link_onto_entities", "onto.edge.link"),
        ("unlink_onto_entities", "onto.edge.unlink"),
    ]
    .into_iter()
    .collect();

    static ref UTILITY_OPS: HashMap<&'static str, &'static str> =
        [("web_search", "util.web.search")].into_iter().collect();

    static ref CALENDAR_OPS: HashMap<&'static str, &'static str> =
        [("list_calendar_events", "cal.event.list")].into_iter().collect();

    /// Plural and shorthand entity spellings, normalized to the singular.
    static ref ENTITY_ALIASES: HashMap<&'static str, &'static str> = [
        ("task", "task"),
        ("tasks", "task"),
        ("project", "project"),
        ("projects", "project"),
        ("document", "document"),
        ("documents", "document"),
        ("doc", "document"),
        ("docs", "document"),
        ("edge", "edge"),
        ("edges", "edge"),
    ]
    .into_iter()
    .collect();

    static ref REGULAR_TOOL_NAME: Regex =
        Regex::new(r"^(list|search|get|create|update|delete)_(onto_)?(.+)$")
            .expect("regular tool name pattern is valid");
}

/// Prefixes that mark a tool as a write when no metadata category says
/// otherwise.
const WRITE_VERB_PREFIXES: &[&str] = &[
    "create_",
    "update_",
    "delete_",
    "link_",
    "unlink_",
    "move_",
    "set_",
    "reorganize_",
];

/// Derive the canonical dotted op for a tool name.
///
/// Returns `None` for names that match neither the exception tables nor the
/// regular pattern; the builder maps those to `x.misc.<tool_name>`.
pub fn derive_op(tool_name: &str) -> Option<String> {
    for table in [&*GENERAL_EXCEPTIONS, &*UTILITY_OPS, &*CALENDAR_OPS] {
        if let Some(op) = table.get(tool_name) {
            return Some((*op).to_string());
        }
    }

    let caps = REGULAR_TOOL_NAME.captures(tool_name)?;
    let verb = caps.get(1).expect("verb group always present").as_str();
    let mut remainder = caps.get(3).expect("entity group always present").as_str();
    remainder = remainder.strip_suffix("_details").unwrap_or(remainder);
    let entity = ENTITY_ALIASES.get(remainder).copied().unwrap_or(remainder);
    Some(format!("onto.{entity}.{verb}"))
}

fn classify_kind(tool_name: &str, metadata: Option<&ToolMetadata>) -> OpKind {
    // Metadata category takes precedence when present; the verb-prefix
    // check below is a fallback for uncataloged tools only.
    if let Some(meta) = metadata {
        return if meta.category == ToolCategory::Write {
            OpKind::Write
        } else {
            OpKind::Read
        };
    }
    if WRITE_VERB_PREFIXES.iter().any(|p| tool_name.starts_with(p)) {
        OpKind::Write
    } else {
        OpKind::Read
    }
}

/// Build the registry from a catalog snapshot and its metadata.
///
/// Fails if two tool names derive the same op; the shipped catalog is
/// regression-tested against that, so `shared_registry` treats a failure
/// here as a packaging bug.
pub fn build_registry(
    tools: &[ToolDefinition],
    metadata: &HashMap<&'static str, ToolMetadata>,
) -> Result<ToolRegistry, RegistryError> {
    let mut ops: BTreeMap<String, RegistryOp> = BTreeMap::new();
    let mut by_tool_name: HashMap<String, String> = HashMap::new();

    for def in tools.iter().filter(|d| !d.name.is_empty()) {
        let op = derive_op(&def.name).unwrap_or_else(|| format!("x.misc.{}", def.name));
        let segments: Vec<&str> = op.split('.').collect();
        let group = OpGroup::from_leading_segment(segments[0]);
        let meta = metadata.get(def.name.as_str());

        let (entity, action) = match group {
            OpGroup::Onto | OpGroup::Cal if segments.len() >= 3 => (
                Some(segments[1].to_string()),
                Some(OpAction::parse(segments[segments.len() - 1])),
            ),
            _ => (None, None),
        };

        let entry = RegistryOp {
            op: op.clone(),
            tool_name: def.name.clone(),
            description: def.description.clone(),
            parameters_schema: def.parameters.clone(),
            group,
            kind: classify_kind(&def.name, meta),
            entity,
            action,
            contexts: meta.map(|m| m.contexts.to_vec()),
        };

        if let Some(existing) = ops.get(&op) {
            return Err(RegistryError::DuplicateOp {
                op,
                first: existing.tool_name.clone(),
                second: def.name.clone(),
            });
        }
        by_tool_name.insert(def.name.clone(), op.clone());
        ops.insert(op, entry);
    }

    let version = compute_version(tools, metadata, &by_tool_name);
    debug!(version = %version, ops = ops.len(), "tool registry built");

    Ok(ToolRegistry {
        version,
        ops,
        by_tool_name,
    })
}

/// Stable content hash over catalog, metadata, and the name→op map.
///
/// `serde_json` maps serialize with sorted keys, so `to_string` of the
/// assembled payload is canonical.
fn compute_version(
    tools: &[ToolDefinition],
    metadata: &HashMap<&'static str, ToolMetadata>,
    by_tool_name: &HashMap<String, String>,
) -> String {
    let tools_json: Vec<Value> = tools
        .iter()
        .map(|t| {
            json!({
                "name": t.name,
                "description": t.description,
                "parameters": t.parameters,
            })
        })
        .collect();

    let mut meta_names: Vec<&&str> = metadata.keys().collect();
    meta_names.sort_unstable();
    let metadata_json: Vec<Value> = meta_names
        .iter()
        .map(|name| {
            let meta = &metadata[**name];
            json!([name, meta])
        })
        .collect();

    let op_map: BTreeMap<&str, &str> = by_tool_name
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let payload = json!([tools_json, metadata_json, op_map]).to_string();
    format!("tool-registry/{:08x}", fnv1a_32(payload.as_bytes()))
}

fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c9dc5;
    for byte in bytes {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

lazy_static! {
    static ref SHARED_REGISTRY: RwLock<Option<Arc<ToolRegistry>>> = RwLock::new(None);
}

/// Process-wide registry built from the shipped catalog, built on first
/// access and cached for the process lifetime.
pub fn shared_registry() -> Result<Arc<ToolRegistry>, RegistryError> {
    if let Some(registry) = SHARED_REGISTRY.read().as_ref() {
        return Ok(Arc::clone(registry));
    }
    let built = Arc::new(build_registry(&CATALOG, &TOOL_METADATA)?);
    let mut guard = SHARED_REGISTRY.write();
    let registry = guard.get_or_insert_with(|| built);
    Ok(Arc::clone(registry))
}

/// Drop the cached registry so the next `shared_registry` call rebuilds.
/// Exists for test isolation; production never needs it because the
/// catalog is static per deployment.
pub fn reset_shared_registry() {
    *SHARED_REGISTRY.write() = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_regular_pattern() {
        assert_eq!(derive_op("list_onto_tasks").as_deref(), Some("onto.task.list"));
        assert_eq!(derive_op("create_onto_task").as_deref(), Some("onto.task.create"));
        assert_eq!(
            derive_op("get_onto_task_details").as_deref(),
            Some("onto.task.get")
        );
        assert_eq!(
            derive_op("search_onto_tasks").as_deref(),
            Some("onto.task.search")
        );
        assert_eq!(
            derive_op("update_onto_project").as_deref(),
            Some("onto.project.update")
        );
        assert_eq!(
            derive_op("list_onto_documents").as_deref(),
            Some("onto.document.list")
        );
    }

    #[test]
    fn test_derive_exceptions_bypass_pattern() {
        // search_ontology would match the regular pattern; the exception
        // table must win.
        assert_eq!(derive_op("search_ontology").as_deref(), Some("onto.search"));
        assert_eq!(
            derive_op("get_document_tree").as_deref(),
            Some("onto.document.tree.get")
        );
        assert_eq!(derive_op("web_search").as_deref(), Some("util.web.search"));
        assert_eq!(
            derive_op("list_calendar_events").as_deref(),
            Some("cal.event.list")
        );
    }

    #[test]
    fn test_derive_unknown_name_returns_none() {
        assert_eq!(derive_op("frobnicate_widgets"), None);
        assert_eq!(derive_op("sync"), None);
    }

    #[test]
    fn test_fallback_namespace_for_unknown_names() {
        let tools = vec![crate::catalog::ToolDefinition {
            name: "frobnicate_widgets".to_string(),
            description: "Frobnicates.".to_string(),
            parameters: json!({"type": "object", "properties": {}}),
        }];
        let registry = build_registry(&tools, &HashMap::new()).unwrap();
        let op = registry.get("x.misc.frobnicate_widgets").unwrap();
        assert_eq!(op.group, OpGroup::X);
        assert!(op.entity.is_none());
        assert!(op.action.is_none());
    }

    #[test]
    fn test_kind_metadata_takes_precedence() {
        // No metadata: prefix decides.
        assert_eq!(classify_kind("move_document_node", None), OpKind::Write);
        assert_eq!(classify_kind("list_onto_tasks", None), OpKind::Read);
        // Metadata present: category decides even against the prefix.
        let meta = ToolMetadata {
            summary: "",
            capabilities: &[],
            contexts: &[],
            category: ToolCategory::Read,
        };
        assert_eq!(classify_kind("delete_onto_task", Some(&meta)), OpKind::Read);
    }

    #[test]
    fn test_duplicate_op_fails_build() {
        let mk = |name: &str| crate::catalog::ToolDefinition {
            name: name.to_string(),
            description: "x.".to_string(),
            parameters: json!({"type": "object", "properties": {}}),
        };
        // Both derive onto.task.get: one via _details stripping.
        let tools = vec![mk("get_onto_task_details"), mk("get_onto_task")];
        let err = build_registry(&tools, &HashMap::new()).unwrap_err();
        match err {
            RegistryError::DuplicateOp { op, first, second } => {
                assert_eq!(op, "onto.task.get");
                assert_eq!(first, "get_onto_task_details");
                assert_eq!(second, "get_onto_task");
            }
        }
    }

    #[test]
    fn test_structured_classification() {
        let registry = build_registry(&CATALOG, &TOOL_METADATA).unwrap();
        let update = registry.get("onto.task.update").unwrap();
        assert_eq!(update.group, OpGroup::Onto);
        assert_eq!(update.entity.as_deref(), Some("task"));
        assert_eq!(update.action, Some(OpAction::Update));
        assert_eq!(update.kind, OpKind::Write);

        let tree_get = registry.get("onto.document.tree.get").unwrap();
        assert_eq!(tree_get.entity.as_deref(), Some("document"));
        assert_eq!(tree_get.action, Some(OpAction::Get));
        assert_eq!(tree_get.segment_count(), 4);

        // onto.search has only two segments: no entity/action split.
        let search = registry.get("onto.search").unwrap();
        assert!(search.entity.is_none());
        assert!(search.action.is_none());
    }
}
