//! Schema construction for the search index.
//!
//! `MappingBuilder` turns the index/type configuration tree into the schema
//! document registered with the search engine before any document is written.

mod builder;
mod schema;

pub use builder::{MappingBuilder, DEFAULT_FIELD_TYPE, DEFAULT_SKIP_TYPES};
pub use schema::{IndexMapping, TypeMapping, TypeMappings};
