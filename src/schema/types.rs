//! Record type definitions.
//!
//! A [`RecordType`] is an ordered list of [`FieldSpec`]s. Field position in
//! the list is the column position whenever headers are absent or not mapped
//! by name. Record types are immutable once resolved for an operation.

use crate::error::SchemaError;
use crate::record::{Date, Value};

/// The primitive kind of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Arbitrary text.
    String,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit floating point.
    Float,
    /// Boolean (`true`/`false`, case-insensitive).
    Boolean,
    /// ISO-8601 calendar date.
    Date,
}

impl FieldKind {
    /// The kind's name as it appears in schema documents.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
        }
    }

    /// Resolve a kind from its schema document name.
    pub fn from_name(name: &str) -> Result<Self, SchemaError> {
        match name {
            "string" => Ok(FieldKind::String),
            "integer" => Ok(FieldKind::Integer),
            "float" => Ok(FieldKind::Float),
            "boolean" => Ok(FieldKind::Boolean),
            "date" => Ok(FieldKind::Date),
            other => Err(SchemaError::UnsupportedKind(other.to_string())),
        }
    }

    /// Coerce non-empty cell text to a typed value.
    pub fn coerce(&self, text: &str) -> Result<Value, String> {
        match self {
            FieldKind::String => Ok(Value::String(text.to_string())),
            FieldKind::Integer => text
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| format!("not an integer: {e}")),
            FieldKind::Float => text
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| format!("not a number: {e}")),
            FieldKind::Boolean => match text.to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                _ => Err("not a boolean (expected true or false)".to_string()),
            },
            FieldKind::Date => Date::parse(text).map(Value::Date),
        }
    }
}

/// A single field of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// The field name, unique within its record type.
    pub name: String,
    /// The value kind.
    pub kind: FieldKind,
    /// Whether an empty cell is accepted and decoded as null.
    pub optional: bool,
}

impl FieldSpec {
    /// Create a required field.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
        }
    }

    /// Mark the field optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Coerce raw cell text to a typed value for this field.
    ///
    /// Empty text decodes to null for optional fields and to the empty string
    /// for required string fields; any other required kind rejects it.
    pub fn coerce(&self, text: &str) -> Result<Value, String> {
        if text.is_empty() {
            if self.optional {
                return Ok(Value::Null);
            }
            if self.kind == FieldKind::String {
                return Ok(Value::String(String::new()));
            }
            return Err("empty value for required field".to_string());
        }
        self.kind.coerce(text)
    }
}

/// A named, ordered sequence of field specifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    name: String,
    fields: Vec<FieldSpec>,
}

impl RecordType {
    /// Create a record type, rejecting duplicate field names.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self {
            name: name.into(),
            fields,
        })
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fields in declared order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Declared field names in order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Position of a field by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}
