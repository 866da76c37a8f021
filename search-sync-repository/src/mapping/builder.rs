//! Mapping builder.
//!
//! Builds the schema document of an index from its configuration. The build
//! is a pure function of the configuration: the input tree is never modified
//! and identical input always yields identical output.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::mapping::schema::{IndexMapping, TypeMapping, TypeMappings};
use search_sync_shared::{IndexConfig, TypeConfig};

/// Type given to field definitions that do not declare one.
pub const DEFAULT_FIELD_TYPE: &str = "string";

/// Field types left untouched by property normalization.
pub const DEFAULT_SKIP_TYPES: &[&str] = &["completion"];

/// Keys of the `_parent` block that only exist while the configuration is resolved.
const PARENT_METADATA_KEYS: [&str; 2] = ["property", "identifier"];

/// Builds index and type mappings from configuration.
///
/// # Example
///
/// ```
/// use search_sync_repository::MappingBuilder;
/// use search_sync_shared::{IndexConfig, TypeConfig};
/// use serde_json::json;
///
/// let properties = json!({ "title": {} }).as_object().cloned().unwrap();
/// let index = IndexConfig::new("app")
///     .with_type(TypeConfig::new("post").with_properties(properties));
///
/// let mapping = MappingBuilder::new().build_index_mapping(&index);
/// assert_eq!(
///     mapping.to_value().unwrap(),
///     json!({ "mappings": { "post": { "properties": { "title": { "type": "string" } } } } })
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MappingBuilder {
    skip_types: HashSet<String>,
}

impl Default for MappingBuilder {
    fn default() -> Self {
        Self {
            skip_types: DEFAULT_SKIP_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl MappingBuilder {
    /// Create a builder with the default skip types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder that leaves fields of the given types untouched.
    pub fn with_skip_types<I, S>(skip_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skip_types: skip_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Build the schema document of an entire index.
    ///
    /// Every type mapping is keyed by its type name under `mappings`, and the
    /// index settings are copied verbatim under `settings`. Either key is
    /// omitted when there is nothing to put in it.
    pub fn build_index_mapping(&self, index_config: &IndexConfig) -> IndexMapping {
        let type_mappings: TypeMappings = index_config
            .types
            .iter()
            .map(|type_config| {
                (
                    type_config.name.clone(),
                    self.build_type_mapping(type_config),
                )
            })
            .collect();

        let mut mapping = IndexMapping::default();
        if !type_mappings.is_empty() {
            mapping.mappings = Some(type_mappings);
        }
        if !index_config.settings.is_empty() {
            mapping.settings = Some(index_config.settings.clone());
        }

        debug!(
            index = %index_config.name,
            types = index_config.types.len(),
            "Built index mapping"
        );
        mapping
    }

    /// Build the mapping of a single type.
    ///
    /// Starts from the raw mapping tree of the type and folds in the
    /// type-level options. The steps run in a fixed order: the emptiness check
    /// on `properties` and the `_meta` injection see the state left by the
    /// earlier steps.
    pub fn build_type_mapping(&self, type_config: &TypeConfig) -> TypeMapping {
        let mut mapping = type_config.mapping.clone();

        if let Some(formats) = &type_config.dynamic_date_formats {
            mapping.insert(
                "dynamic_date_formats".to_string(),
                Value::Array(formats.iter().cloned().map(Value::String).collect()),
            );
        }

        if let Some(date_detection) = type_config.date_detection {
            mapping.insert("date_detection".to_string(), Value::Bool(date_detection));
        }

        if let Some(numeric_detection) = type_config.numeric_detection {
            mapping.insert(
                "numeric_detection".to_string(),
                Value::Bool(numeric_detection),
            );
        }

        if let Some(analyzer) = type_config.analyzer.as_deref().filter(|a| !a.is_empty()) {
            mapping.insert("analyzer".to_string(), Value::String(analyzer.to_string()));
        }

        if let Some(dynamic) = type_config.dynamic {
            mapping.insert("dynamic".to_string(), dynamic.to_value());
        }

        // An empty template list is rejected by the engine
        if mapping.get("dynamic_templates").is_some_and(is_empty_value) {
            mapping.remove("dynamic_templates");
        }

        strip_parent_metadata(&mut mapping);

        match mapping.remove("properties") {
            Some(Value::Object(properties)) => {
                let properties = self.fix_properties(&properties);
                if !properties.is_empty() {
                    mapping.insert("properties".to_string(), Value::Object(properties));
                }
            }
            Some(other) if !is_empty_value(&other) => {
                mapping.insert("properties".to_string(), other);
            }
            _ => {}
        }

        if let Some(model) = type_config.model.as_deref().filter(|m| !m.is_empty()) {
            let meta = mapping
                .entry("_meta")
                .or_insert_with(|| Value::Object(Map::new()));
            if !meta.is_object() {
                *meta = Value::Object(Map::new());
            }
            if let Value::Object(meta) = meta {
                meta.insert("model".to_string(), Value::String(model.to_string()));
            }
        }

        // The result never carries these keys, whatever the steps above did.
        strip_parent_metadata(&mut mapping);

        TypeMapping::from(mapping)
    }

    /// Normalize a tree of field definitions.
    ///
    /// Returns a new tree in which every field definition has the transient
    /// `property_path` attribute removed and a `type` (defaulting to
    /// `"string"`). Sub-fields of `multi_field` definitions and nested
    /// `properties` are normalized recursively. Fields whose type is a skip
    /// type keep their definition as is apart from `property_path`. A `null`
    /// or empty-array definition counts as an empty definition.
    pub fn fix_properties(&self, properties: &Map<String, Value>) -> Map<String, Value> {
        properties
            .iter()
            .map(|(name, field)| (name.clone(), self.fix_field(field)))
            .collect()
    }

    fn fix_field(&self, field: &Value) -> Value {
        let mut definition = match field {
            Value::Object(definition) => definition.clone(),
            // A bare field name declares a field with an empty definition
            Value::Null => Map::new(),
            Value::Array(items) if items.is_empty() => Map::new(),
            other => return other.clone(),
        };

        definition.remove("property_path");

        if self.is_skip_type(&definition) {
            return Value::Object(definition);
        }

        let is_multi_field = definition
            .entry("type")
            .or_insert_with(|| Value::String(DEFAULT_FIELD_TYPE.to_string()))
            .as_str()
            == Some("multi_field");

        if is_multi_field {
            if let Some(fields) = definition
                .get("fields")
                .and_then(Value::as_object)
                .map(|fields| self.fix_properties(fields))
            {
                definition.insert("fields".to_string(), Value::Object(fields));
            }
        }

        if let Some(properties) = definition
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| self.fix_properties(properties))
        {
            definition.insert("properties".to_string(), Value::Object(properties));
        }

        Value::Object(definition)
    }

    fn is_skip_type(&self, definition: &Map<String, Value>) -> bool {
        definition
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|field_type| self.skip_types.contains(field_type))
    }
}

/// Remove configuration-only keys from the `_parent` block, if any.
fn strip_parent_metadata(mapping: &mut Map<String, Value>) {
    if let Some(Value::Object(parent)) = mapping.get_mut("_parent") {
        for key in PARENT_METADATA_KEYS {
            parent.remove(key);
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        _ => false,
    }
}
