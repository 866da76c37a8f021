//! Serde-based model transformer.
//!
//! `JsonModelTransformer` turns any serializable domain object into a
//! document by serializing it to a JSON object and copying the requested
//! fields.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::TransformError;
use crate::interfaces::ModelTransformer;
use search_sync_shared::Document;

/// Default name of the identifier field.
pub const DEFAULT_IDENTIFIER_FIELD: &str = "id";

/// Transformer for domain objects implementing `Serialize`.
///
/// The document identifier is read from the identifier field of the
/// serialized object, which must be a non-empty string or a number.
#[derive(Debug, Clone)]
pub struct JsonModelTransformer {
    identifier_field: String,
}

impl Default for JsonModelTransformer {
    fn default() -> Self {
        Self {
            identifier_field: DEFAULT_IDENTIFIER_FIELD.to_string(),
        }
    }
}

impl JsonModelTransformer {
    /// Create a transformer reading the identifier from `id`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transformer reading the identifier from `identifier_field`.
    pub fn with_identifier_field(identifier_field: impl Into<String>) -> Self {
        Self {
            identifier_field: identifier_field.into(),
        }
    }

    fn identifier(&self, source: &Map<String, Value>) -> Result<String, TransformError> {
        match source.get(&self.identifier_field) {
            Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(TransformError::missing_identifier(&self.identifier_field)),
        }
    }
}

impl<O> ModelTransformer<O> for JsonModelTransformer
where
    O: Serialize,
{
    fn transform(&self, object: &O, fields: &[String]) -> Result<Document, TransformError> {
        let source = match serde_json::to_value(object) {
            Ok(Value::Object(source)) => source,
            Ok(other) => {
                return Err(TransformError::malformed(format!(
                    "expected an object, got {}",
                    json_kind(&other)
                )))
            }
            Err(e) => return Err(TransformError::serialization(e.to_string())),
        };

        let id = self.identifier(&source)?;

        if fields.is_empty() {
            return Ok(Document::new(id, source));
        }

        let mut data = Map::new();
        for field in fields {
            let value = source
                .get(field)
                .ok_or_else(|| TransformError::missing_field(field))?;
            data.insert(field.clone(), value.clone());
        }

        Ok(Document::new(id, data))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Post {
        id: u64,
        title: String,
        body: Option<String>,
    }

    #[derive(Serialize)]
    struct Tag {
        slug: String,
    }

    fn post() -> Post {
        Post {
            id: 7,
            title: "Hello".to_string(),
            body: None,
        }
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_transform_selected_fields() {
        let transformer = JsonModelTransformer::new();

        let doc = transformer.transform(&post(), &fields(&["title"])).unwrap();

        assert_eq!(doc.id, "7");
        assert_eq!(doc.data.len(), 1);
        assert_eq!(doc.get("title"), Some(&json!("Hello")));
        assert!(!doc.doc_as_upsert);
    }

    #[test]
    fn test_transform_all_fields() {
        let transformer = JsonModelTransformer::new();

        let doc = transformer.transform(&post(), &[]).unwrap();

        assert_eq!(doc.data.len(), 3);
        assert_eq!(doc.get("body"), Some(&Value::Null));
    }

    #[test]
    fn test_missing_field() {
        let transformer = JsonModelTransformer::new();

        let result = transformer.transform(&post(), &fields(&["title", "author"]));

        assert_eq!(result.unwrap_err(), TransformError::missing_field("author"));
    }

    #[test]
    fn test_custom_identifier_field() {
        let transformer = JsonModelTransformer::with_identifier_field("slug");
        let tag = Tag {
            slug: "rust".to_string(),
        };

        let doc = transformer.transform(&tag, &[]).unwrap();
        assert_eq!(doc.id, "rust");

        let empty = Tag {
            slug: String::new(),
        };
        let result = transformer.transform(&empty, &[]);
        assert!(matches!(result, Err(TransformError::MissingIdentifier(_))));
    }

    #[test]
    fn test_missing_identifier() {
        let transformer = JsonModelTransformer::new();
        let tag = Tag {
            slug: "rust".to_string(),
        };

        let result = transformer.transform(&tag, &[]);

        assert_eq!(result.unwrap_err(), TransformError::missing_identifier("id"));
    }

    #[test]
    fn test_non_object_is_malformed() {
        let transformer = JsonModelTransformer::new();

        let result = transformer.transform(&vec![1, 2, 3], &[]);

        assert!(matches!(result, Err(TransformError::MalformedObject(_))));
    }
}
