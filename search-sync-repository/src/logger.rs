//! Error logger implementations.

use tracing::error;

use crate::errors::SearchIndexError;
use crate::interfaces::ErrorLogger;

/// Logger that records errors as `tracing` events.
///
/// Partial bulk failures are logged once per failed item so every rejected
/// document can be found in the logs.
#[derive(Debug, Clone, Default)]
pub struct TracingErrorLogger;

impl ErrorLogger for TracingErrorLogger {
    fn error(&self, err: &SearchIndexError) {
        match err.bulk_failure() {
            Some(failure) => {
                error!(
                    failed_items = failure.items.len(),
                    error = %err,
                    "Bulk request partially failed"
                );
                for item in &failure.items {
                    error!(
                        doc_id = %item.id,
                        action = %item.action,
                        status = item.status,
                        reason = %item.reason,
                        "Bulk item failed"
                    );
                }
            }
            None => error!(error = %err, "Search index error"),
        }
    }
}
