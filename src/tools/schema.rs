//! Argument validation against a tool's draft-04 parameter schema.
//!
//! Covers the subset tool schemas use: top-level `type: object`,
//! `properties` with per-field `type` (single or list) and `enum`,
//! `required`, and `additionalProperties: false`. Unknown keywords are
//! ignored.

use super::error::SchemaViolation;
use serde_json::{Map, Value};

/// Validate `args` against `schema`, collecting every violation.
///
/// A `null` argument value is treated as an empty object.
pub fn validate(schema: &Value, args: &Value) -> Result<(), Vec<SchemaViolation>> {
    let empty = Map::new();
    let obj = match args {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            return Err(vec![SchemaViolation::new(
                "(arguments)",
                format!("expected object, got {}", type_name(other)),
            )])
        }
    };

    let mut violations = Vec::new();
    let properties = schema.get("properties").and_then(Value::as_object);

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            match obj.get(field) {
                None | Some(Value::Null) => {
                    violations.push(SchemaViolation::new(field, "missing required field"))
                }
                Some(_) => {}
            }
        }
    }

    for (field, value) in obj {
        let Some(prop) = properties.and_then(|p| p.get(field)) else {
            if schema.get("additionalProperties") == Some(&Value::Bool(false)) {
                violations.push(SchemaViolation::new(field, "unexpected field"));
            }
            continue;
        };
        if value.is_null() {
            continue;
        }
        if let Some(expected) = prop.get("type") {
            if !type_matches(expected, value) {
                violations.push(SchemaViolation::new(
                    field,
                    format!("expected {}, got {}", expected_label(expected), type_name(value)),
                ));
                continue;
            }
        }
        if let Some(allowed) = prop.get("enum").and_then(Value::as_array) {
            if !allowed.contains(value) {
                violations.push(SchemaViolation::new(field, "value not in enum"));
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn type_matches(expected: &Value, value: &Value) -> bool {
    match expected {
        Value::String(t) => is_type(t, value),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| is_type(t, value)),
        _ => true,
    }
}

fn is_type(t: &str, value: &Value) -> bool {
    match t {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn expected_label(expected: &Value) -> String {
    match expected {
        Value::String(t) => t.clone(),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" or "),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
