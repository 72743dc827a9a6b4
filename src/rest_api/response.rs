//! # Response Formatting
//!
//! Success bodies for the write endpoints. Get, find and insert answer with
//! the record(s) themselves.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Update response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub document: Value,
    pub updated: u64,
}

/// Delete response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: u64,
}
