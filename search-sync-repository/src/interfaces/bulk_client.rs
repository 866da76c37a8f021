//! Bulk client trait definition.
//!
//! This module defines the abstract interface for bulk document writes,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use search_sync_shared::Document;

/// Abstracts the underlying bulk-write implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into a `SearchType` handle and used by the
/// object persisters. Every method submits a single bulk request.
///
/// # Error Handling
///
/// When only some items of a batch fail, implementations return
/// `SearchIndexError::BulkPartialFailure` carrying the failed items. Any other
/// variant signals that the request as a whole failed (connectivity,
/// serialization, rejected request).
#[async_trait]
pub trait BulkClient: Send + Sync {
    /// Index documents, replacing any existing document with the same id.
    ///
    /// # Arguments
    ///
    /// * `index` - Name of the target index
    /// * `type_name` - Name of the target type
    /// * `documents` - Documents to index, in submission order
    async fn add_documents(
        &self,
        index: &str,
        type_name: &str,
        documents: &[Document],
    ) -> Result<(), SearchIndexError>;

    /// Update documents with their field values.
    ///
    /// Documents flagged with `doc_as_upsert` are created when they do not
    /// exist yet.
    async fn update_documents(
        &self,
        index: &str,
        type_name: &str,
        documents: &[Document],
    ) -> Result<(), SearchIndexError>;

    /// Delete the documents identified by the ids of `documents`.
    async fn delete_documents(
        &self,
        index: &str,
        type_name: &str,
        documents: &[Document],
    ) -> Result<(), SearchIndexError>;

    /// Delete documents by identifier, optionally scoped by a routing key.
    ///
    /// # Arguments
    ///
    /// * `identifiers` - Document identifiers to delete
    /// * `index` - Name of the target index
    /// * `type_name` - Name of the target type
    /// * `routing` - Routing key applied to every delete, if any
    async fn delete_ids(
        &self,
        identifiers: &[String],
        index: &str,
        type_name: &str,
        routing: Option<&str>,
    ) -> Result<(), SearchIndexError>;
}
