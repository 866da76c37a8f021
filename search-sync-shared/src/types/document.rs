//! Document types for the search index.
//!
//! This module defines the unit of storage written to the search engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Document representation for the search index.
///
/// A document is an identifier plus the field values extracted from a domain
/// object. It is produced by a transformer and consumed by the bulk client.
///
/// # Fields
///
/// - `id`: Identifier of the document within its index and type
/// - `data`: Field name to value mapping sent as the document source
/// - `doc_as_upsert`: When set, an update creates the document if it is missing
/// - `routing`: Optional routing key used to pick the shard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub doc_as_upsert: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
}

impl Document {
    /// Create a new document from an identifier and its field values.
    ///
    /// # Example
    ///
    /// ```
    /// use search_sync_shared::Document;
    /// use serde_json::{json, Map};
    ///
    /// let mut data = Map::new();
    /// data.insert("title".to_string(), json!("Hello"));
    /// let doc = Document::new("42", data);
    /// assert_eq!(doc.id, "42");
    /// assert!(!doc.doc_as_upsert);
    /// ```
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            data,
            doc_as_upsert: false,
            routing: None,
        }
    }

    /// Set a single field value, replacing any previous value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.data.insert(field.into(), value);
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Mark the document for insert-or-update semantics.
    pub fn set_doc_as_upsert(&mut self, doc_as_upsert: bool) {
        self.doc_as_upsert = doc_as_upsert;
    }

    /// Set the routing key.
    pub fn with_routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }
}
