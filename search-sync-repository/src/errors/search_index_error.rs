//! Search index error types.
//!
//! This module defines the unified error type for all search sync operations,
//! including both low-level backend errors and the bulk partial-failure kind
//! that persisters may log instead of propagating.

use thiserror::Error;

use crate::errors::TransformError;
use crate::types::BulkFailure;

/// Unified errors from search index operations.
///
/// Used by the `BulkClient` trait and the object persisters. Only
/// `BulkPartialFailure` is eligible for suppression by a persister's
/// `BulkFailurePolicy`; every other variant always reaches the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., duplicate type names, empty identifiers).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to establish connection to the search index backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A domain object could not be transformed into a document.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Some items of a bulk request failed.
    #[error("Bulk partial failure: {0}")]
    BulkPartialFailure(BulkFailure),

    /// The bulk request as a whole was rejected.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// Failed to create the search index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to parse response from search index backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize data for the search index backend.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Source records of a batch no longer exist.
    ///
    /// Raised upstream of the persister when identifiers reference objects
    /// that were removed from the source of truth. Never suppressed.
    #[error("Missing objects: {message} ({})", .identifiers.join(", "))]
    MissingObjects {
        message: String,
        identifiers: Vec<String>,
    },
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a bulk partial failure error.
    pub fn bulk_partial_failure(failure: BulkFailure) -> Self {
        Self::BulkPartialFailure(failure)
    }

    /// Create a bulk index error.
    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a missing objects error.
    pub fn missing_objects<I, S>(msg: impl Into<String>, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingObjects {
            message: msg.into(),
            identifiers: identifiers.into_iter().map(Into::into).collect(),
        }
    }

    /// Identifiers of the missing objects, when this is a missing objects error.
    pub fn missing_identifiers(&self) -> Option<&[String]> {
        match self {
            Self::MissingObjects { identifiers, .. } => Some(identifiers),
            _ => None,
        }
    }

    /// Whether this is the bulk-specific partial failure kind.
    pub fn is_bulk_partial_failure(&self) -> bool {
        matches!(self, Self::BulkPartialFailure(_))
    }

    /// The failed items, when this is a bulk partial failure.
    pub fn bulk_failure(&self) -> Option<&BulkFailure> {
        match self {
            Self::BulkPartialFailure(failure) => Some(failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BulkItemFailure;

    #[test]
    fn test_bulk_partial_failure_classification() {
        let failure = BulkFailure::new(
            "1 of 2 items failed",
            vec![BulkItemFailure::new("2", "index", 400, "mapper_parsing_exception")],
        );
        let error = SearchIndexError::bulk_partial_failure(failure);

        assert!(error.is_bulk_partial_failure());
        assert_eq!(error.bulk_failure().map(|f| f.items.len()), Some(1));

        let error = SearchIndexError::connection("refused");
        assert!(!error.is_bulk_partial_failure());
        assert!(error.bulk_failure().is_none());
    }

    #[test]
    fn test_missing_objects() {
        let error = SearchIndexError::missing_objects("Cannot find corresponding objects", ["4", "9"]);

        assert_eq!(
            error.missing_identifiers(),
            Some(&["4".to_string(), "9".to_string()][..])
        );
        assert_eq!(
            error.to_string(),
            "Missing objects: Cannot find corresponding objects (4, 9)"
        );
        assert!(!error.is_bulk_partial_failure());
        assert!(error.bulk_failure().is_none());
        assert!(SearchIndexError::parse("bad").missing_identifiers().is_none());
    }

    #[test]
    fn test_transform_error_conversion() {
        let error: SearchIndexError = TransformError::missing_field("title").into();
        assert!(matches!(error, SearchIndexError::Transform(_)));
        assert!(!error.is_bulk_partial_failure());
    }
}
