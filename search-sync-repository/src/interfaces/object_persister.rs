//! Object persister trait definition.
//!
//! This module defines the interface for inserting, replacing and deleting
//! domain objects in a search type. Objects are converted to documents by a
//! transformer before they are written.

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::interfaces::DomainObject;

/// Inserts, replaces and deletes domain objects in a search type.
///
/// All `*_one` operations are conveniences over the matching bulk operation
/// with a single-element batch. Batch sizes are chosen by the caller.
#[async_trait]
pub trait ObjectPersister<O: DomainObject>: Send + Sync {
    /// Check whether this persister can handle the given object.
    fn handles_object(&self, object: &O) -> bool;

    /// Insert one object into the type.
    async fn insert_one(&self, object: &O) -> Result<(), SearchIndexError>;

    /// Replace one object in the type, creating it if it does not exist.
    async fn replace_one(&self, object: &O) -> Result<(), SearchIndexError>;

    /// Delete one object from the type.
    async fn delete_one(&self, object: &O) -> Result<(), SearchIndexError>;

    /// Delete one document from the type by identifier.
    async fn delete_by_id(&self, id: &str) -> Result<(), SearchIndexError>;

    /// Bulk insert objects into the type.
    ///
    /// # Arguments
    ///
    /// * `objects` - Domain objects to insert, in submission order
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the batch was written, or a partial failure was logged
    /// * `Err(SearchIndexError::Transform)` - If any object failed to transform;
    ///   nothing is written in that case
    /// * `Err(SearchIndexError)` - If the bulk write failed
    async fn insert_many(&self, objects: &[O]) -> Result<(), SearchIndexError>;

    /// Bulk replace objects in the type with insert-or-update semantics.
    async fn replace_many(&self, objects: &[O]) -> Result<(), SearchIndexError>;

    /// Bulk delete objects from the type.
    async fn delete_many(&self, objects: &[O]) -> Result<(), SearchIndexError>;

    /// Bulk delete documents by identifier.
    ///
    /// # Arguments
    ///
    /// * `identifiers` - Identifiers of the documents to delete
    /// * `routing` - Routing key used for every delete, if any
    async fn delete_many_by_identifiers(
        &self,
        identifiers: &[String],
        routing: Option<&str>,
    ) -> Result<(), SearchIndexError>;
}
