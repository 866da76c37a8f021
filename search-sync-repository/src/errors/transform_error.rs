//! Transformer error types.

use thiserror::Error;

/// Errors raised when a domain object cannot be turned into a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// A requested field is not present on the object.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// The identifier field is absent, empty or not a scalar.
    #[error("Missing identifier: {0}")]
    MissingIdentifier(String),

    /// The object does not have the shape the transformer expects.
    #[error("Malformed object: {0}")]
    MalformedObject(String),

    /// The object could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TransformError {
    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Create a missing identifier error.
    pub fn missing_identifier(field: impl Into<String>) -> Self {
        Self::MissingIdentifier(field.into())
    }

    /// Create a malformed object error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedObject(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}
