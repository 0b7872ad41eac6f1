//! Open attribute maps for remote records.
//!
//! The remote catalog attaches an unpredictable set of attributes to systems
//! and bodies, and grows new ones over time. The mirror keeps the fields it
//! understands typed and carries the rest through as an opaque [`Document`],
//! so canonical hashing and passthrough persistence stay format-agnostic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CoreError;
use crate::ids::EntityKey;

/// An open key-value record as received from the remote catalog.
///
/// Thin wrapper over a JSON object. Accessors return `None` rather than
/// failing when a field is absent or has a surprising type; constructors that
/// need a field to exist go through the `require_*` variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(
    /// The underlying JSON object map.
    pub Map<String, Value>,
);

impl Document {
    /// Empty document.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// True when the remote sent nothing (e.g. unknown system id).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw field access.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String field, if present and a string.
    #[must_use]
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Integer field, if present and integral.
    #[must_use]
    pub fn i64_field(&self, field: &str) -> Option<i64> {
        self.0.get(field).and_then(Value::as_i64)
    }

    /// Float field. Integral JSON numbers are widened.
    #[must_use]
    pub fn f64_field(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }

    /// Boolean field, if present and a bool.
    #[must_use]
    pub fn bool_field(&self, field: &str) -> Option<bool> {
        self.0.get(field).and_then(Value::as_bool)
    }

    /// Nested object field as a sub-document.
    #[must_use]
    pub fn object_field(&self, field: &str) -> Option<Document> {
        self.0
            .get(field)
            .and_then(Value::as_object)
            .map(|m| Document(m.clone()))
    }

    /// Extract the composite `(id, id64)` identity carried by the record.
    pub fn entity_key(&self) -> Result<EntityKey, CoreError> {
        let id = self.i64_field("id").ok_or(CoreError::missing("id"))?;
        let id64 = self.i64_field("id64").ok_or(CoreError::missing("id64"))?;
        Ok(EntityKey::new(id, id64))
    }

    /// The document as a JSON value (cloning the underlying map).
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Wrap a JSON value. Objects become documents, anything else is an error.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(CoreError::invalid("<root>", "object")),
        }
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        Document::from_value(json!({
            "id": 17,
            "id64": 3489,
            "name": "Ix",
            "requirePermit": true,
            "coords": {"x": 1.0, "y": 2.0, "z": 3.0},
        }))
        .unwrap()
    }

    #[test]
    fn typed_accessors() {
        let doc = sample();
        assert_eq!(doc.str_field("name"), Some("Ix"));
        assert_eq!(doc.bool_field("requirePermit"), Some(true));
        assert_eq!(doc.i64_field("id"), Some(17));
        assert!(doc.str_field("missing").is_none());
        assert!(doc.i64_field("name").is_none());
    }

    #[test]
    fn extracts_entity_key() {
        assert_eq!(sample().entity_key().unwrap(), EntityKey::new(17, 3489));
    }

    #[test]
    fn entity_key_requires_both_ids() {
        let doc = Document::from_value(json!({"id": 1})).unwrap();
        assert!(doc.entity_key().is_err());
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert!(Document::from_value(json!([1, 2, 3])).is_err());
        assert!(Document::from_value(json!("text")).is_err());
    }
}
