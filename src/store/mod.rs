//! # Document Store
//!
//! The persistence contract the record access layer talks to. Every
//! operation is asynchronous and reports failure through its result; nothing
//! is signalled by panics or side channels.

pub mod errors;
pub mod id;
pub mod memory;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::query::Query;

pub use errors::{StoreError, StoreResult};
pub use id::{DocumentId, ID_FIELD};
pub use memory::InMemoryDocumentStore;

/// Connection string scheme served by [`InMemoryDocumentStore`]
pub const MEMORY_SCHEME: &str = "memory://";

/// Boxed future returned by store operations
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Durability confirmation requested for a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteConcern {
    /// The store confirms the write before reporting success
    Acknowledged,
    /// Fire and forget
    Unacknowledged,
}

/// Result of a write
#[derive(Debug, Clone, PartialEq)]
pub struct WriteReceipt<T> {
    /// Whether the store confirmed durability
    pub acknowledged: bool,
    pub value: T,
}

impl<T> WriteReceipt<T> {
    pub fn new(concern: WriteConcern, value: T) -> Self {
        Self {
            acknowledged: concern == WriteConcern::Acknowledged,
            value,
        }
    }
}

/// Document store trait for a set of named collections
pub trait DocumentStore: Send + Sync {
    /// Fetch the document with the given id
    fn find_one<'a>(&'a self, collection: &'a str, id: DocumentId)
        -> StoreFuture<'a, Option<Value>>;

    /// Fetch every document matching `query`, in insertion order
    fn find<'a>(&'a self, collection: &'a str, query: &'a Query) -> StoreFuture<'a, Vec<Value>>;

    /// Store a new document, assigning an id if it has none.
    /// The receipt carries the stored document.
    fn insert_one<'a>(
        &'a self,
        collection: &'a str,
        document: Value,
        concern: WriteConcern,
    ) -> StoreFuture<'a, WriteReceipt<Value>>;

    /// Replace the whole document with the given id. Never inserts.
    /// The receipt carries the stored replacement, or `None` if nothing matched.
    fn replace_one<'a>(
        &'a self,
        collection: &'a str,
        id: DocumentId,
        document: Value,
        concern: WriteConcern,
    ) -> StoreFuture<'a, WriteReceipt<Option<Value>>>;

    /// Remove the document with the given id.
    /// The receipt carries the number of documents removed.
    fn delete_one<'a>(
        &'a self,
        collection: &'a str,
        id: DocumentId,
        concern: WriteConcern,
    ) -> StoreFuture<'a, WriteReceipt<u64>>;
}

/// Open the store named by a connection string
pub fn open_store(connection_string: &str) -> StoreResult<Arc<dyn DocumentStore>> {
    if connection_string.starts_with(MEMORY_SCHEME) {
        return Ok(Arc::new(InMemoryDocumentStore::new()));
    }

    Err(StoreError::backend(format!(
        "Unsupported connection string: {}",
        connection_string
    )))
}
