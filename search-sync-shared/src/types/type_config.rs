//! Type configuration for the search index.
//!
//! A `TypeConfig` describes one document type within an index: its raw mapping
//! tree and the type-level options that are folded into the schema when the
//! mapping is built.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dynamic mapping mode for fields that are not declared in the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDynamicMode", into = "RawDynamicMode")]
pub enum DynamicMode {
    /// New fields are added to the mapping.
    Enabled,
    /// New fields are ignored.
    Disabled,
    /// New fields are rejected.
    Strict,
}

impl DynamicMode {
    /// The value the search engine expects for the `dynamic` key.
    pub fn to_value(self) -> Value {
        match self {
            Self::Enabled => Value::Bool(true),
            Self::Disabled => Value::Bool(false),
            Self::Strict => Value::String("strict".to_string()),
        }
    }
}

/// Wire form of `DynamicMode`: either a boolean or one of the named modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawDynamicMode {
    Flag(bool),
    Named(String),
}

impl TryFrom<RawDynamicMode> for DynamicMode {
    type Error = String;

    fn try_from(raw: RawDynamicMode) -> Result<Self, Self::Error> {
        match raw {
            RawDynamicMode::Flag(true) => Ok(Self::Enabled),
            RawDynamicMode::Flag(false) => Ok(Self::Disabled),
            RawDynamicMode::Named(name) => match name.to_lowercase().as_str() {
                "true" => Ok(Self::Enabled),
                "false" => Ok(Self::Disabled),
                "strict" => Ok(Self::Strict),
                other => Err(format!(
                    "invalid dynamic mode '{}', expected true, false or strict",
                    other
                )),
            },
        }
    }
}

impl From<DynamicMode> for RawDynamicMode {
    fn from(mode: DynamicMode) -> Self {
        match mode {
            DynamicMode::Enabled => Self::Flag(true),
            DynamicMode::Disabled => Self::Flag(false),
            DynamicMode::Strict => Self::Named("strict".to_string()),
        }
    }
}

/// Configuration of one document type within an index.
///
/// The `mapping` tree is kept as the raw JSON object supplied by the
/// configuration subsystem. It may contain `properties`, `dynamic_templates`,
/// `_parent`, `_source` and any other engine key. Field definitions inside
/// `properties` may carry a transient `property_path`, which is metadata for
/// the transformer and is stripped when the schema is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeConfig {
    /// Name of the type, unique within its index.
    pub name: String,
    /// Raw mapping tree.
    #[serde(default)]
    pub mapping: Map<String, Value>,
    /// Default analyzer for the type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    /// Dynamic mapping mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<DynamicMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_detection: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_detection: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_date_formats: Option<Vec<String>>,
    /// Class name of the domain model persisted into this type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl TypeConfig {
    /// Create a type configuration with an empty mapping and no options set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the `properties` tree of the mapping.
    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.mapping
            .insert("properties".to_string(), Value::Object(properties));
        self
    }

    /// Set the `dynamic_templates` list of the mapping.
    pub fn with_dynamic_templates(mut self, templates: Vec<Value>) -> Self {
        self.mapping
            .insert("dynamic_templates".to_string(), Value::Array(templates));
        self
    }

    /// Set the `_parent` block of the mapping.
    ///
    /// The block may carry `property` and `identifier` keys used while the
    /// configuration is resolved; they never reach the built schema.
    pub fn with_parent(mut self, parent: Map<String, Value>) -> Self {
        self.mapping
            .insert("_parent".to_string(), Value::Object(parent));
        self
    }

    /// Set an arbitrary key of the raw mapping.
    pub fn with_mapping_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.mapping.insert(key.into(), value);
        self
    }

    pub fn with_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn with_dynamic(mut self, dynamic: DynamicMode) -> Self {
        self.dynamic = Some(dynamic);
        self
    }

    pub fn with_date_detection(mut self, date_detection: bool) -> Self {
        self.date_detection = Some(date_detection);
        self
    }

    pub fn with_numeric_detection(mut self, numeric_detection: bool) -> Self {
        self.numeric_detection = Some(numeric_detection);
        self
    }

    pub fn with_dynamic_date_formats(mut self, formats: Vec<String>) -> Self {
        self.dynamic_date_formats = Some(formats);
        self
    }

    /// Associate the type with a domain model class.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
