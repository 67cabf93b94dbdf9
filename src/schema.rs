//! Typed views over the JSON-schema-like parameter objects in the catalog.
//!
//! The catalog authors schemas as raw `serde_json` values; this module is
//! the one place that interprets them. Property types are parsed into a
//! closed enum so the help generator can match exhaustively instead of
//! probing optional fields.

use serde_json::{json, Map, Value};

/// The closed set of JSON-schema property types the catalog may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl SchemaType {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }
}

/// Collect every named type of a property schema, in first-seen order.
///
/// Handles `type` as a single name or an array of names, and recurses into
/// `anyOf`/`oneOf`/`allOf` unions.
pub fn collect_types(schema: &Value) -> Vec<SchemaType> {
    let mut types = Vec::new();
    collect_into(schema, &mut types);
    types
}

fn collect_into(schema: &Value, out: &mut Vec<SchemaType>) {
    match schema.get("type") {
        Some(Value::String(name)) => {
            if let Some(t) = SchemaType::parse(name) {
                push_unique(out, t);
            }
        }
        Some(Value::Array(names)) => {
            for name in names.iter().filter_map(|n| n.as_str()) {
                if let Some(t) = SchemaType::parse(name) {
                    push_unique(out, t);
                }
            }
        }
        _ => {}
    }
    for key in ["anyOf", "oneOf", "allOf"] {
        if let Some(variants) = schema.get(key).and_then(|v| v.as_array()) {
            for variant in variants {
                collect_into(variant, out);
            }
        }
    }
}

fn push_unique(out: &mut Vec<SchemaType>, t: SchemaType) {
    if !out.contains(&t) {
        out.push(t);
    }
}

/// Human-readable type label for an args table, e.g. `"string | null"`.
pub fn type_label(schema: &Value) -> String {
    let types = collect_types(schema);
    if types.is_empty() {
        return "any".to_string();
    }
    types
        .iter()
        .map(|t| t.label())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Build a placeholder example value for one property.
///
/// Name patterns win over the declared schema type so that example payloads
/// read as instructions (`"<task_id_uuid>"`) rather than bare dummy data.
pub fn placeholder_value(name: &str, schema: &Value) -> Value {
    if name.ends_with("_id") {
        return json!(format!("<{name}_uuid>"));
    }
    if name == "query" || name == "search" {
        return json!("<search query>");
    }
    if name == "title" || name.ends_with("_title") {
        return json!("<title>");
    }
    if name == "name" || name.ends_with("_name") {
        return json!("<name>");
    }
    if name == "description" || name.ends_with("_description") {
        return json!("<description>");
    }
    if name == "content" || name == "body_markdown" {
        return json!("<markdown content>");
    }
    if name == "type_key" {
        return json!("<type_key>");
    }
    if name == "state_key" {
        return json!("<state_key>");
    }

    for t in collect_types(schema) {
        return match t {
            SchemaType::String => json!(format!("<{name}>")),
            SchemaType::Number | SchemaType::Integer => json!(0),
            SchemaType::Boolean => json!(false),
            SchemaType::Array => json!([]),
            SchemaType::Object => json!({}),
            SchemaType::Null => continue,
        };
    }
    json!(format!("<{name}>"))
}

/// The `properties` map of an object schema, or an empty map.
pub fn properties(schema: &Value) -> Map<String, Value> {
    schema
        .get("properties")
        .and_then(|p| p.as_object())
        .cloned()
        .unwrap_or_default()
}

/// The `required` list of an object schema, or empty.
pub fn required(schema: &Value) -> Vec<String> {
    schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|names| {
            names
                .iter()
                .filter_map(|n| n.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_types_single_and_union() {
        assert_eq!(collect_types(&json!({"type": "string"})), vec![SchemaType::String]);
        assert_eq!(
            collect_types(&json!({"type": ["string", "null"]})),
            vec![SchemaType::String, SchemaType::Null]
        );
    }

    #[test]
    fn test_collect_types_recurses_unions() {
        let schema = json!({
            "anyOf": [
                {"type": "integer"},
                {"oneOf": [{"type": "string"}, {"type": "null"}]}
            ]
        });
        assert_eq!(
            collect_types(&schema),
            vec![SchemaType::Integer, SchemaType::String, SchemaType::Null]
        );
    }

    #[test]
    fn test_type_label_joins_with_pipe() {
        assert_eq!(type_label(&json!({"type": ["string", "null"]})), "string | null");
        assert_eq!(type_label(&json!({})), "any");
    }

    #[test]
    fn test_placeholder_name_patterns_win() {
        assert_eq!(
            placeholder_value("task_id", &json!({"type": "string"})),
            json!("<task_id_uuid>")
        );
        assert_eq!(
            placeholder_value("query", &json!({"type": "string"})),
            json!("<search query>")
        );
        assert_eq!(
            placeholder_value("body_markdown", &json!({"type": "string"})),
            json!("<markdown content>")
        );
        assert_eq!(
            placeholder_value("state_key", &json!({"type": "string"})),
            json!("<state_key>")
        );
    }

    #[test]
    fn test_placeholder_falls_back_to_schema_type() {
        assert_eq!(placeholder_value("limit", &json!({"type": "integer"})), json!(0));
        assert_eq!(
            placeholder_value("include_done", &json!({"type": "boolean"})),
            json!(false)
        );
        assert_eq!(placeholder_value("tags", &json!({"type": "array"})), json!([]));
        assert_eq!(placeholder_value("extra", &json!({"type": "object"})), json!({}));
        assert_eq!(placeholder_value("note", &json!({})), json!("<note>"));
    }

    #[test]
    fn test_placeholder_skips_null_in_unions() {
        // ["null", "string"] should still produce a string placeholder
        let schema = json!({"type": ["null", "string"]});
        assert_eq!(placeholder_value("window", &schema), json!("<window>"));
    }
}
