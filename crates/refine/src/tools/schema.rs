//! Minimal JSON Schema validation for model output and tool arguments.

use serde_json::Value;

use crate::error::{FilterError, Result};

/// Validate a JSON value against a minimal JSON Schema subset.
///
/// Supports: `type`, `required`, `properties` (recursive), `items`, and
/// `additionalProperties: false`. An empty schema `{}` passes anything.
pub fn validate_schema(value: &Value, schema: &Value) -> Result<()> {
    validate_at(value, schema, "$")
}

fn validate_at(value: &Value, schema: &Value, path: &str) -> Result<()> {
    let schema_obj = match schema.as_object() {
        Some(obj) => obj,
        None => return Ok(()),
    };

    if schema_obj.is_empty() {
        return Ok(());
    }

    if let Some(type_val) = schema_obj.get("type") {
        let type_str = type_val.as_str().ok_or_else(|| {
            FilterError::InvalidInput("schema 'type' must be a string".to_string())
        })?;

        let matches = match type_str {
            "string" => value.is_string(),
            "number" => value.as_f64().is_some_and(f64::is_finite),
            "integer" => value.is_i64() || value.is_u64(),
            "boolean" => value.is_boolean(),
            "object" => value.is_object(),
            "array" => value.is_array(),
            "null" => value.is_null(),
            other => {
                return Err(FilterError::InvalidInput(format!(
                    "unknown schema type: {other}"
                )));
            }
        };

        if !matches {
            return Err(FilterError::ResponseValidation(format!(
                "{path}: expected type '{type_str}', got {}",
                json_type_name(value)
            )));
        }
    }

    if let (Some(required), Some(obj)) = (
        schema_obj.get("required").and_then(Value::as_array),
        value.as_object(),
    ) {
        for key in required.iter().filter_map(Value::as_str) {
            if !obj.contains_key(key) {
                return Err(FilterError::ResponseValidation(format!(
                    "{path}: missing required field '{key}'"
                )));
            }
        }
    }

    if let (Some(props_obj), Some(val_obj)) = (
        schema_obj.get("properties").and_then(Value::as_object),
        value.as_object(),
    ) {
        for (key, prop_schema) in props_obj {
            if let Some(prop_value) = val_obj.get(key) {
                validate_at(prop_value, prop_schema, &format!("{path}.{key}"))?;
            }
        }
        if schema_obj.get("additionalProperties") == Some(&Value::Bool(false)) {
            if let Some(extra) = val_obj.keys().find(|key| !props_obj.contains_key(*key)) {
                return Err(FilterError::ResponseValidation(format!(
                    "{path}: unexpected field '{extra}'"
                )));
            }
        }
    }

    if let (Some(item_schema), Some(items)) = (schema_obj.get("items"), value.as_array()) {
        for (index, item) in items.iter().enumerate() {
            validate_at(item, item_schema, &format!("{path}[{index}]"))?;
        }
    }

    Ok(())
}

/// Returns a human-readable name for the JSON type of a value.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
