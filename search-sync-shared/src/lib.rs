//! # Search Sync Shared
//!
//! This crate defines the data structures shared across the search sync crates:
//! the index/type configuration tree that drives schema construction, and the
//! `Document` unit of storage produced from domain objects.

pub mod types;

pub use types::document::Document;
pub use types::index_config::IndexConfig;
pub use types::type_config::{DynamicMode, TypeConfig};
