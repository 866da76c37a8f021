//! Request and response types for bulk operations.

use thiserror::Error;

/// Failure of a single item within a bulk request.
///
/// Identifies the document and the action that failed together with the
/// status and reason reported by the search engine.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemFailure {
    /// Identifier of the document the item targeted.
    pub id: String,
    /// Bulk action of the item (`index`, `update` or `delete`).
    pub action: String,
    /// HTTP status reported for the item.
    pub status: u16,
    /// Reason reported by the search engine.
    pub reason: String,
}

impl BulkItemFailure {
    pub fn new(
        id: impl Into<String>,
        action: impl Into<String>,
        status: u16,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            action: action.into(),
            status,
            reason: reason.into(),
        }
    }
}

/// Partial failure of a bulk request.
///
/// Raised by a `BulkClient` when some items of a batch were rejected. Carries
/// every failed item so callers can report or retry them.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} ({} failed items)", .items.len())]
pub struct BulkFailure {
    /// Summary of the failure.
    pub message: String,
    /// Items that failed.
    pub items: Vec<BulkItemFailure>,
}

impl BulkFailure {
    pub fn new(message: impl Into<String>, items: Vec<BulkItemFailure>) -> Self {
        Self {
            message: message.into(),
            items,
        }
    }

    /// Identifiers of the failed documents, in response order.
    pub fn failed_ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_failure_display() {
        let failure = BulkFailure::new(
            "Bulk update had failures",
            vec![
                BulkItemFailure::new("1", "update", 409, "version_conflict_engine_exception"),
                BulkItemFailure::new("4", "update", 400, "mapper_parsing_exception"),
            ],
        );

        assert_eq!(failure.to_string(), "Bulk update had failures (2 failed items)");
        assert_eq!(failure.failed_ids(), vec!["1", "4"]);
    }
}
