//! Diagnostic logger trait definition.

use crate::errors::SearchIndexError;

/// Sink for errors that a persister records instead of propagating.
///
/// Logging is fire-and-forget: implementations must not fail or panic.
pub trait ErrorLogger: Send + Sync {
    /// Record an error.
    fn error(&self, error: &SearchIndexError);
}
