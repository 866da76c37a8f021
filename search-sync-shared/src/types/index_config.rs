//! Index configuration for the search engine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::type_config::TypeConfig;

/// Configuration of one search index.
///
/// Built once from static configuration at startup and read-only afterwards.
/// Type names are expected to be unique within an index; use
/// [`IndexConfig::duplicate_type_names`] to check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Name of the index.
    pub name: String,
    /// Types of the index, in declaration order.
    #[serde(default)]
    pub types: Vec<TypeConfig>,
    /// Engine-specific index settings, copied verbatim into the schema.
    #[serde(default)]
    pub settings: Map<String, Value>,
}

impl IndexConfig {
    /// Create an index configuration with no types and no settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            settings: Map::new(),
        }
    }

    /// Append a type.
    pub fn with_type(mut self, type_config: TypeConfig) -> Self {
        self.types.push(type_config);
        self
    }

    /// Replace the index settings.
    pub fn with_settings(mut self, settings: Map<String, Value>) -> Self {
        self.settings = settings;
        self
    }

    /// Look up a type by name.
    pub fn type_config(&self, name: &str) -> Option<&TypeConfig> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Names that appear more than once among the index types, in order of
    /// their second occurrence.
    pub fn duplicate_type_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for type_config in &self.types {
            let name = type_config.name.as_str();
            if !seen.insert(name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }
}
