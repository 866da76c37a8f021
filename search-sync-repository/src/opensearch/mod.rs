//! OpenSearch implementation of the bulk client.
//!
//! This module provides a concrete implementation of `BulkClient` using
//! OpenSearch as the backend.

mod bulk_client;

pub use bulk_client::OpenSearchBulkClient;
