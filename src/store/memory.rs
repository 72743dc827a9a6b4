//! # In-Memory Document Store
//!
//! Collections of JSON documents kept in insertion order behind a lock.
//! Served for `memory://` connection strings and used by the test suites.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::query::Query;

use super::errors::{StoreError, StoreResult};
use super::id::{DocumentId, ID_FIELD};
use super::{DocumentStore, StoreFuture, WriteConcern, WriteReceipt};

/// In-memory document store
pub struct InMemoryDocumentStore {
    /// Data store: collection -> documents
    data: RwLock<HashMap<String, Vec<Value>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: &str) -> StoreResult<usize> {
        self.read_collection(collection, |docs| docs.len())
    }

    fn read_collection<T>(&self, collection: &str, f: impl FnOnce(&[Value]) -> T) -> StoreResult<T> {
        let data = self
            .data
            .read()
            .map_err(|_| StoreError::backend("Lock poisoned"))?;

        Ok(f(data.get(collection).map(Vec::as_slice).unwrap_or(&[])))
    }

    fn write_collection<T>(
        &self,
        collection: &str,
        f: impl FnOnce(&mut Vec<Value>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::backend("Lock poisoned"))?;

        f(data.entry(collection.to_string()).or_default())
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn id_of(doc: &Value) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

fn position(docs: &[Value], id: &str) -> Option<usize> {
    docs.iter().position(|doc| id_of(doc) == Some(id))
}

/// Validate a new document and stamp its canonical id
fn prepare_insert(document: Value, existing: &[Value]) -> StoreResult<Value> {
    let Value::Object(mut members) = document else {
        return Err(StoreError::NotADocument);
    };

    let id = match members.get(ID_FIELD) {
        None => DocumentId::generate(),
        Some(Value::String(raw)) => DocumentId::parse(raw)?,
        Some(other) => return Err(StoreError::InvalidId(other.to_string())),
    }
    .to_string();

    if position(existing, &id).is_some() {
        return Err(StoreError::DuplicateId(id));
    }

    members.insert(ID_FIELD.to_string(), Value::String(id));
    Ok(Value::Object(members))
}

/// Validate a replacement and pin it to the target id
fn prepare_replacement(id: DocumentId, document: Value) -> StoreResult<Value> {
    let Value::Object(mut members) = document else {
        return Err(StoreError::NotADocument);
    };

    if let Some(found) = members.get(ID_FIELD) {
        let same = found
            .as_str()
            .and_then(|raw| DocumentId::parse(raw).ok())
            .map(|parsed| parsed == id)
            .unwrap_or(false);
        if !same {
            return Err(StoreError::ImmutableId {
                expected: id.to_string(),
                found: found.to_string(),
            });
        }
    }

    members.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    Ok(Value::Object(members))
}

impl DocumentStore for InMemoryDocumentStore {
    fn find_one<'a>(
        &'a self,
        collection: &'a str,
        id: DocumentId,
    ) -> StoreFuture<'a, Option<Value>> {
        Box::pin(async move {
            let id = id.to_string();
            self.read_collection(collection, |docs| {
                position(docs, &id).map(|idx| docs[idx].clone())
            })
        })
    }

    fn find<'a>(&'a self, collection: &'a str, query: &'a Query) -> StoreFuture<'a, Vec<Value>> {
        Box::pin(async move {
            self.read_collection(collection, |docs| {
                docs.iter().filter(|doc| query.matches(doc)).cloned().collect()
            })
        })
    }

    fn insert_one<'a>(
        &'a self,
        collection: &'a str,
        document: Value,
        concern: WriteConcern,
    ) -> StoreFuture<'a, WriteReceipt<Value>> {
        Box::pin(async move {
            self.write_collection(collection, |docs| {
                let stored = prepare_insert(document, docs)?;
                docs.push(stored.clone());
                Ok(WriteReceipt::new(concern, stored))
            })
        })
    }

    fn replace_one<'a>(
        &'a self,
        collection: &'a str,
        id: DocumentId,
        document: Value,
        concern: WriteConcern,
    ) -> StoreFuture<'a, WriteReceipt<Option<Value>>> {
        Box::pin(async move {
            if !document.is_object() {
                return Err(StoreError::NotADocument);
            }

            self.write_collection(collection, |docs| {
                let Some(idx) = position(docs, &id.to_string()) else {
                    return Ok(WriteReceipt::new(concern, None));
                };

                let replacement = prepare_replacement(id, document)?;
                docs[idx] = replacement.clone();
                Ok(WriteReceipt::new(concern, Some(replacement)))
            })
        })
    }

    fn delete_one<'a>(
        &'a self,
        collection: &'a str,
        id: DocumentId,
        concern: WriteConcern,
    ) -> StoreFuture<'a, WriteReceipt<u64>> {
        Box::pin(async move {
            self.write_collection(collection, |docs| {
                let removed = match position(docs, &id.to_string()) {
                    Some(idx) => {
                        docs.remove(idx);
                        1
                    }
                    None => 0,
                };
                Ok(WriteReceipt::new(concern, removed))
            })
        })
    }
}
