//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a document store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Identifier is not in the store's id format
    #[error("Invalid document id: {0}")]
    InvalidId(String),

    /// Only JSON objects can be stored
    #[error("Document must be a JSON object")]
    NotADocument,

    /// Insert with an id that already exists
    #[error("Duplicate document id: {0}")]
    DuplicateId(String),

    /// Replacement tried to change the document id
    #[error("Field _id is immutable (expected {expected}, got {found})")]
    ImmutableId { expected: String, found: String },

    /// Connectivity or driver fault
    #[error("Store failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
