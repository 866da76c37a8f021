//! Configuration types for the object persisters.

/// What a persister does when the bulk client reports a partial failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkFailurePolicy {
    /// Return the partial failure to the caller unchanged.
    #[default]
    Propagate,
    /// Record the partial failure with the persister's logger and return normally.
    LogAndContinue,
}

/// Configuration for a `BulkObjectPersister`.
///
/// This struct holds the field selection passed to the transformer and the
/// policy applied to partial bulk failures. Only partial failures are
/// affected by the policy; every other error always reaches the caller.
#[derive(Debug, Clone, Default)]
pub struct PersisterConfig {
    /// Fields to include when transforming objects into documents.
    ///
    /// An empty list lets the transformer decide which fields to include.
    pub fields: Vec<String>,
    /// Policy applied to partial bulk failures.
    pub failure_policy: BulkFailurePolicy,
}

impl PersisterConfig {
    /// Create a config that propagates partial failures.
    ///
    /// # Arguments
    ///
    /// * `fields` - Fields to include when transforming objects into documents
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            failure_policy: BulkFailurePolicy::Propagate,
        }
    }

    /// Set the policy applied to partial bulk failures.
    pub fn with_failure_policy(mut self, failure_policy: BulkFailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}
