//! Utility functions for the search sync repository.

use search_sync_shared::IndexConfig;

use crate::errors::SearchIndexError;

/// Validate an index configuration before building its schema.
///
/// Rejects an empty index name, empty type names and type names used more
/// than once within the index.
///
/// # Example
///
/// ```
/// use search_sync_repository::validate_index_config;
/// use search_sync_shared::{IndexConfig, TypeConfig};
///
/// let config = IndexConfig::new("app")
///     .with_type(TypeConfig::new("post"))
///     .with_type(TypeConfig::new("post"));
///
/// assert!(validate_index_config(&config).is_err());
/// ```
pub fn validate_index_config(config: &IndexConfig) -> Result<(), SearchIndexError> {
    if config.name.is_empty() {
        return Err(SearchIndexError::validation("Index name cannot be empty"));
    }

    if config.types.iter().any(|type_config| type_config.name.is_empty()) {
        return Err(SearchIndexError::validation(format!(
            "Index '{}' has a type with an empty name",
            config.name
        )));
    }

    let duplicates = config.duplicate_type_names();
    if !duplicates.is_empty() {
        return Err(SearchIndexError::validation(format!(
            "Index '{}' declares duplicate types: {}",
            config.name,
            duplicates.join(", ")
        )));
    }

    Ok(())
}
