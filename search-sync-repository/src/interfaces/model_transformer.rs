//! Model transformer trait definition.

use crate::errors::TransformError;
use search_sync_shared::Document;

/// Turns a domain object into a search document.
///
/// Implementations extract the requested fields from the object and return a
/// document carrying the object's identifier. A transformer never returns an
/// empty placeholder: when a field cannot be extracted or the object is
/// malformed it fails with a `TransformError`.
pub trait ModelTransformer<O>: Send + Sync {
    /// Transform `object`, keeping only `fields` (all fields when empty).
    fn transform(&self, object: &O, fields: &[String]) -> Result<Document, TransformError>;
}
