//! # Search Sync Repository
//!
//! This crate keeps a search index in sync with application domain objects.
//! It builds the index schema from the configuration tree, persists objects
//! through a bulk client, and ships a concrete bulk client for OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod logger;
pub mod mapping;
pub mod opensearch;
pub mod persister;
pub mod registry;
pub mod search_type;
pub mod transformer;
pub mod types;
pub mod utils;

pub use config::{BulkFailurePolicy, PersisterConfig};
pub use errors::{SearchIndexError, TransformError};
pub use interfaces::{BulkClient, DomainObject, ErrorLogger, ModelTransformer, ObjectPersister};
pub use logger::TracingErrorLogger;
pub use mapping::{IndexMapping, MappingBuilder, TypeMapping, TypeMappings};
pub use opensearch::OpenSearchBulkClient;
pub use persister::BulkObjectPersister;
pub use registry::ModelRegistry;
pub use search_type::SearchType;
pub use transformer::JsonModelTransformer;
pub use types::{BulkFailure, BulkItemFailure};
pub use utils::validate_index_config;
