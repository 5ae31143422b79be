//! # Loosely Typed Documents
//!
//! Remote documents arrive with no schema guarantees: numeric fields may be
//! numbers or numeric strings, string fields may be missing, and unknown
//! fields may appear. This module provides the tolerant accessors the
//! per-collection mapping layer builds on.
//!
//! ## Coercion Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Tolerant Field Access                                 │
//! │                                                                         │
//! │  str_field:   "x" → "x"        missing/non-string → None               │
//! │  i64_field:   42  → 42         "42" → 42     "?"/missing → None        │
//! │  f64_field:   1.5 → 1.5        "1.5" → 1.5   "?"/missing → None        │
//! │  bool_field:  true → true      missing/non-bool → None                 │
//! │                                                                         │
//! │  Callers decide whether a None means "default to zero/empty" or        │
//! │  "skip this document" — that decision lives in the mapping layer,      │
//! │  never here.                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::{Map, Value};

/// A single remote document: server key plus loose field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Server-assigned document key.
    pub id: String,

    /// Field map as delivered by the store.
    pub fields: Map<String, Value>,
}

impl Document {
    /// Creates a document with the given key and empty fields.
    pub fn new(id: impl Into<String>) -> Self {
        Document {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Creates a document from a key and prepared fields.
    pub fn with_fields(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Document {
            id: id.into(),
            fields,
        }
    }

    /// Builder-style field setter, mainly for tests and seeding.
    ///
    /// ## Example
    /// ```rust
    /// use storesync_remote::Document;
    ///
    /// let doc = Document::new("item-1")
    ///     .set("name", "Rice")
    ///     .set("quantity", 12);
    /// assert_eq!(doc.str_field("name"), Some("Rice"));
    /// ```
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// String field, if present and actually a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// String field coerced to owned, empty when missing.
    pub fn string_or_empty(&self, key: &str) -> String {
        self.str_field(key).unwrap_or_default().to_string()
    }

    /// Integer field, accepting numbers and numeric strings.
    pub fn i64_field(&self, key: &str) -> Option<i64> {
        match self.fields.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Float field, accepting numbers and numeric strings.
    pub fn f64_field(&self, key: &str) -> Option<f64> {
        match self.fields.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Boolean field, if present and actually a boolean.
    pub fn bool_field(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(Value::as_bool)
    }

    /// Object field as a nested map, if present.
    pub fn object_field(&self, key: &str) -> Option<&Map<String, Value>> {
        self.fields.get(key).and_then(Value::as_object)
    }

    /// Raw value access for the mapping layer's special cases.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Whether the document carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Document {
        Document::new("d1")
            .set("name", "Rice")
            .set("quantity", 12)
            .set("quantity_str", "34")
            .set("price", 50.5)
            .set("price_str", "50.5")
            .set("active", true)
            .set("attrs", json!({"color": "red"}))
    }

    #[test]
    fn test_str_field() {
        let d = doc();
        assert_eq!(d.str_field("name"), Some("Rice"));
        assert_eq!(d.str_field("missing"), None);
        assert_eq!(d.string_or_empty("missing"), "");
    }

    #[test]
    fn test_i64_field_coerces_strings() {
        let d = doc();
        assert_eq!(d.i64_field("quantity"), Some(12));
        assert_eq!(d.i64_field("quantity_str"), Some(34));
        assert_eq!(d.i64_field("name"), None);
        assert_eq!(d.i64_field("missing"), None);
    }

    #[test]
    fn test_f64_field_coerces_strings() {
        let d = doc();
        assert_eq!(d.f64_field("price"), Some(50.5));
        assert_eq!(d.f64_field("price_str"), Some(50.5));
        assert_eq!(d.f64_field("active"), None);
    }

    #[test]
    fn test_bool_and_object_fields() {
        let d = doc();
        assert_eq!(d.bool_field("active"), Some(true));
        assert!(d.object_field("attrs").is_some());
        assert!(d.object_field("name").is_none());
    }
}
