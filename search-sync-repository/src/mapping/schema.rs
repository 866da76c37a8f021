//! Typed schema documents produced by the mapping builder.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::SearchIndexError;

/// Mapping of a single type.
///
/// Always serializes as a JSON object, so a type without any mapping entry is
/// sent as `{}` and never as an empty array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeMapping(Map<String, Value>);

impl TypeMapping {
    /// Create an empty type mapping.
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get a top-level entry of the mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

}

impl From<Map<String, Value>> for TypeMapping {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Type mappings of an index keyed by type name, in declaration order.
///
/// Serializes as a JSON object whose keys follow the order in which the
/// types were inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeMappings(Vec<(String, TypeMapping)>);

impl TypeMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the mapping of a type, replacing an earlier one in place.
    pub fn insert(&mut self, type_name: impl Into<String>, mapping: TypeMapping) {
        let type_name = type_name.into();
        match self.0.iter_mut().find(|(name, _)| *name == type_name) {
            Some((_, existing)) => *existing = mapping,
            None => self.0.push((type_name, mapping)),
        }
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeMapping> {
        self.0
            .iter()
            .find(|(name, _)| name == type_name)
            .map(|(_, mapping)| mapping)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Type names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeMapping)> {
        self.0.iter().map(|(name, mapping)| (name.as_str(), mapping))
    }
}

impl FromIterator<(String, TypeMapping)> for TypeMappings {
    fn from_iter<I: IntoIterator<Item = (String, TypeMapping)>>(iter: I) -> Self {
        let mut mappings = Self::new();
        for (type_name, mapping) in iter {
            mappings.insert(type_name, mapping);
        }
        mappings
    }
}

impl Serialize for TypeMappings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, mapping)| (name, mapping)))
    }
}

impl<'de> Deserialize<'de> for TypeMappings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TypeMappingsVisitor;

        impl<'de> Visitor<'de> for TypeMappingsVisitor {
            type Value = TypeMappings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of type names to type mappings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut mappings = TypeMappings::new();
                while let Some((type_name, mapping)) = access.next_entry::<String, TypeMapping>()? {
                    mappings.insert(type_name, mapping);
                }
                Ok(mappings)
            }
        }

        deserializer.deserialize_map(TypeMappingsVisitor)
    }
}

/// Schema document of a whole index.
///
/// `mappings` holds one entry per type keyed by type name and `settings` the
/// index settings. Either key is left out of the serialized document when it
/// is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappings: Option<TypeMappings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
}

impl IndexMapping {
    pub fn is_empty(&self) -> bool {
        self.mappings.is_none() && self.settings.is_none()
    }

    /// Look up the mapping of a type by name.
    pub fn type_mapping(&self, type_name: &str) -> Option<&TypeMapping> {
        self.mappings.as_ref()?.get(type_name)
    }

    /// Serialize the schema into the JSON body sent to the search engine.
    pub fn to_value(&self) -> Result<Value, SearchIndexError> {
        serde_json::to_value(self).map_err(|e| SearchIndexError::serialization(e.to_string()))
    }
}
