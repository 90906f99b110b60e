//! JSON schema parser for record types.
//!
//! Parses record type JSON documents into [`RecordType`] values. The shape:
//!
//! ```json
//! {
//!   "name": "trade",
//!   "fields": [
//!     {"name": "id", "type": "integer"},
//!     {"name": "note", "type": "string", "optional": true}
//!   ]
//! }
//! ```

use serde_json::Value;

use crate::error::SchemaError;
use crate::schema::{FieldKind, FieldSpec, RecordType};

/// Parse a record type from a JSON string.
///
/// # Example
/// ```
/// use csvbind::schema::parse_record_type;
///
/// let rt = parse_record_type(
///     r#"{"name": "point", "fields": [
///         {"name": "x", "type": "float"},
///         {"name": "y", "type": "float"}
///     ]}"#,
/// )
/// .unwrap();
/// assert_eq!(rt.name(), "point");
/// assert_eq!(rt.fields().len(), 2);
/// ```
pub fn parse_record_type(json: &str) -> Result<RecordType, SchemaError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SchemaError::InvalidSchema(format!("Invalid JSON: {e}")))?;
    parse_record_type_value(&value)
}

/// Parse a record type from an already-parsed JSON value.
pub fn parse_record_type_value(value: &Value) -> Result<RecordType, SchemaError> {
    let obj = value
        .as_object()
        .ok_or_else(|| SchemaError::InvalidSchema("Schema must be a JSON object".to_string()))?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::InvalidSchema("Schema requires a string 'name'".to_string()))?;
    if name.is_empty() {
        return Err(SchemaError::InvalidSchema(
            "Schema name must not be empty".to_string(),
        ));
    }

    let fields = obj
        .get("fields")
        .and_then(Value::as_array)
        .ok_or_else(|| SchemaError::InvalidSchema("Schema requires a 'fields' array".to_string()))?;
    if fields.is_empty() {
        return Err(SchemaError::InvalidSchema(
            "Schema requires at least one field".to_string(),
        ));
    }

    let fields = fields
        .iter()
        .map(parse_field)
        .collect::<Result<Vec<_>, _>>()?;

    RecordType::new(name, fields)
}

fn parse_field(value: &Value) -> Result<FieldSpec, SchemaError> {
    let obj = value
        .as_object()
        .ok_or_else(|| SchemaError::InvalidSchema("Field must be a JSON object".to_string()))?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::InvalidSchema("Field requires a string 'name'".to_string()))?;
    if name.is_empty() {
        return Err(SchemaError::InvalidSchema(
            "Field name must not be empty".to_string(),
        ));
    }

    let kind_name = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::InvalidSchema(format!("Field {name:?} requires a 'type'")))?;
    let kind = FieldKind::from_name(kind_name)?;

    let optional = match obj.get("optional") {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            return Err(SchemaError::InvalidSchema(format!(
                "Field {name:?}: 'optional' must be a boolean"
            )))
        }
    };

    let mut spec = FieldSpec::new(name, kind);
    if optional {
        spec = spec.optional();
    }
    Ok(spec)
}
