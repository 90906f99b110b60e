//! Schema registry: logical type name to record type resolution.
//!
//! Decode and encode never look types up through a global repository; the
//! registry is an explicit interface injected into the service, so callers
//! decide where type definitions come from.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::SchemaError;
use crate::schema::parser::parse_record_type_value;
use crate::schema::RecordType;

/// Resolves a logical type name to a record type.
pub trait SchemaRegistry: Send + Sync {
    /// Resolve a record type by name.
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownType` when the name is not registered.
    fn resolve(&self, name: &str) -> Result<Arc<RecordType>, SchemaError>;
}

/// A registry backed by an in-process map.
///
/// Types are registered up front and the registry is then shared read-only;
/// resolution never mutates state.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    types: HashMap<String, Arc<RecordType>>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record type under its own name.
    ///
    /// Re-registering a name replaces the previous definition.
    pub fn register(&mut self, record_type: RecordType) {
        self.types
            .insert(record_type.name().to_string(), Arc::new(record_type));
    }

    /// Register a record type parsed from a JSON schema document.
    pub fn register_json(&mut self, json: &str) -> Result<(), SchemaError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| SchemaError::InvalidSchema(format!("Invalid JSON: {e}")))?;
        self.register(parse_record_type_value(&value)?);
        Ok(())
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl SchemaRegistry for InMemoryRegistry {
    fn resolve(&self, name: &str) -> Result<Arc<RecordType>, SchemaError> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, FieldSpec};

    fn sample_type() -> RecordType {
        RecordType::new("trade", vec![FieldSpec::new("id", FieldKind::Integer)]).unwrap()
    }

    #[test]
    fn test_resolve_registered_type() {
        let mut registry = InMemoryRegistry::new();
        registry.register(sample_type());

        let rt = registry.resolve("trade").unwrap();
        assert_eq!(rt.name(), "trade");
    }

    #[test]
    fn test_resolve_unknown_type() {
        let registry = InMemoryRegistry::new();
        let err = registry.resolve("missing").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType(n) if n == "missing"));
    }

    #[test]
    fn test_register_json() {
        let mut registry = InMemoryRegistry::new();
        registry
            .register_json(r#"{"name": "point", "fields": [{"name": "x", "type": "float"}]}"#)
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("point").is_ok());
    }

    #[test]
    fn test_reregister_replaces() {
        let mut registry = InMemoryRegistry::new();
        registry.register(sample_type());
        registry.register(
            RecordType::new("trade", vec![FieldSpec::new("qty", FieldKind::Integer)]).unwrap(),
        );

        let rt = registry.resolve("trade").unwrap();
        assert_eq!(rt.field_names(), vec!["qty"]);
    }
}
