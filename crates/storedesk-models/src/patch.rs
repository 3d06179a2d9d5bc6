//! Partial-record payloads sent on create/update/toggle.
//!
//! # Design
//! - Keys are wire (snake_case) field names so the patch can be sent as-is.
//! - A patch merged over a serialized record yields the record the server would
//!   have echoed, which lets callers reconcile locally when it does not echo.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered set of changed fields keyed by wire name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPatch(Map<String, Value>);

impl FieldPatch {
    /// Empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field patch, the shape used by status toggles.
    #[must_use]
    pub fn single(key: &str, value: impl Into<Value>) -> Self {
        let mut patch = Self::new();
        patch.insert(key, value);
        patch
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Read a field by wire name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether a field is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of changed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Changed field names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Overlay the patch on a serialized record. Non-object bases are replaced.
    #[must_use]
    pub fn merge_into(&self, base: Value) -> Value {
        let mut merged = match base {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in &self.0 {
            merged.insert(key.clone(), value.clone());
        }
        Value::Object(merged)
    }

    /// Convert into a JSON object body.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::FieldPatch;
    use serde_json::json;

    #[test]
    fn merge_overrides_only_patched_fields() {
        let patch = FieldPatch::single("status", "disabled");
        let merged = patch.merge_into(json!({"id": "A", "status": "active", "name": "n"}));
        assert_eq!(merged, json!({"id": "A", "status": "disabled", "name": "n"}));
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut patch = FieldPatch::new();
        patch.insert("is_blocked", true);
        assert_eq!(
            serde_json::to_value(&patch).expect("serialize"),
            json!({"is_blocked": true})
        );
    }
}
