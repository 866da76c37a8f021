//! # Search Sync
//!
//! Setup binary for the search sync system. It reads the index
//! configuration, builds the schema with `MappingBuilder` and registers the
//! index with OpenSearch before any object is persisted.
//!
//! ## Modules
//!
//! - [`config`]: Settings, configuration loading and dependency initialization

pub mod config;

pub use config::{ConnectionMode, Dependencies, Settings};

use search_sync_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur during setup.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from the search index.
    #[error("Search index error: {0}")]
    Repository(#[from] SearchIndexError),
}

impl SetupError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
