//! Classified results of record operations.

use serde_json::Value;

use crate::store::StoreError;

/// What a store operation produced, before any HTTP mapping
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A single record (get, or the echoed insert)
    Found(Value),

    /// Find results, possibly empty depending on the find policy
    FoundMany(Vec<Value>),

    /// No record matched the id or query
    NotFound,

    /// Whole-document replace succeeded
    Updated { document: Value, count: u64 },

    /// Delete succeeded
    Deleted(u64),

    /// The store refused or failed the operation
    StoreError(String),
}

impl Outcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Found(_) => "found",
            Outcome::FoundMany(_) => "found_many",
            Outcome::NotFound => "not_found",
            Outcome::Updated { .. } => "updated",
            Outcome::Deleted(_) => "deleted",
            Outcome::StoreError(_) => "store_error",
        }
    }
}

impl From<StoreError> for Outcome {
    fn from(err: StoreError) -> Self {
        Outcome::StoreError(err.to_string())
    }
}
