//! Search type handle.

use std::fmt;
use std::sync::Arc;

use crate::errors::SearchIndexError;
use crate::interfaces::BulkClient;
use search_sync_shared::Document;

/// Handle on one type of one index, bound to the bulk client that writes to it.
///
/// Cloning the handle is cheap; clones share the client.
#[derive(Clone)]
pub struct SearchType {
    index: String,
    name: String,
    client: Arc<dyn BulkClient>,
}

impl SearchType {
    /// Create a handle for `name` in `index`.
    pub fn new(index: impl Into<String>, name: impl Into<String>, client: Arc<dyn BulkClient>) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            client,
        }
    }

    /// Name of the index.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Name of the type.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn add_documents(&self, documents: &[Document]) -> Result<(), SearchIndexError> {
        self.client
            .add_documents(&self.index, &self.name, documents)
            .await
    }

    pub async fn update_documents(&self, documents: &[Document]) -> Result<(), SearchIndexError> {
        self.client
            .update_documents(&self.index, &self.name, documents)
            .await
    }

    pub async fn delete_documents(&self, documents: &[Document]) -> Result<(), SearchIndexError> {
        self.client
            .delete_documents(&self.index, &self.name, documents)
            .await
    }

    /// Delete documents of this type by identifier.
    pub async fn delete_ids(
        &self,
        identifiers: &[String],
        routing: Option<&str>,
    ) -> Result<(), SearchIndexError> {
        self.client
            .delete_ids(identifiers, &self.index, &self.name, routing)
            .await
    }
}

impl fmt::Debug for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchType")
            .field("index", &self.index)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
