//! Error types for the search sync repository.
//!
//! `SearchIndexError` is the unified error of every persister and client
//! operation. Transformer failures have their own type so callers can match
//! on them.

mod search_index_error;
mod transform_error;

pub use search_index_error::SearchIndexError;
pub use transform_error::TransformError;
