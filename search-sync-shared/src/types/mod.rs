//! This module defines the core data structures used across the search sync crates.
//! It re-exports the configuration tree types and `Document`.

pub mod document;
pub mod index_config;
pub mod type_config;

pub use document::Document;
pub use index_config::IndexConfig;
pub use type_config::{DynamicMode, TypeConfig};
