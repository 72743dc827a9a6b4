//! # Record Access Layer
//!
//! Runs the five record operations against the configured collection and
//! classifies what the store reports. Writes are screened first and always
//! request an acknowledged write.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::guard::{ContentScreen, Screening, ScriptTagScreen, ValidationError};
use crate::query::Query;
use crate::store::{DocumentId, DocumentStore, StoreError, WriteConcern, WriteReceipt};

use super::outcome::Outcome;

/// How a find with zero matches is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindPolicy {
    /// Zero matches is `NotFound` (404)
    EmptyIsNotFound,
    /// Zero matches is an empty `FoundMany` (200)
    EmptyIsSuccess,
}

impl FindPolicy {
    pub fn from_flag(empty_is_not_found: bool) -> Self {
        if empty_is_not_found {
            FindPolicy::EmptyIsNotFound
        } else {
            FindPolicy::EmptyIsSuccess
        }
    }
}

/// Record operations for one collection
pub struct RecordAccess {
    store: Arc<dyn DocumentStore>,
    collection: String,
    screen: Arc<dyn ContentScreen>,
    find_policy: FindPolicy,
}

impl RecordAccess {
    /// Create an access layer with the script-tag screen and the
    /// empty-is-not-found find policy
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            screen: Arc::new(ScriptTagScreen),
            find_policy: FindPolicy::EmptyIsNotFound,
        }
    }

    pub fn with_screen(mut self, screen: impl ContentScreen + 'static) -> Self {
        self.screen = Arc::new(screen);
        self
    }

    pub fn with_find_policy(mut self, policy: FindPolicy) -> Self {
        self.find_policy = policy;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Fetch one record. A malformed id is a store error, not a miss.
    pub async fn get_by_id(&self, id: &str) -> Outcome {
        let id = match DocumentId::parse(id) {
            Ok(id) => id,
            Err(e) => return self.store_failure("get", e),
        };

        match self.store.find_one(&self.collection, id).await {
            Ok(Some(record)) => Outcome::Found(record),
            Ok(None) => Outcome::NotFound,
            Err(e) => self.store_failure("get", e),
        }
    }

    /// Fetch every record matching `query`
    pub async fn find(&self, query: &Query) -> Outcome {
        debug!(collection = %self.collection, query = %query.to_value(), "find");

        match self.store.find(&self.collection, query).await {
            Ok(records) => {
                info!(collection = %self.collection, "Found {} records.", records.len());
                if records.is_empty() && self.find_policy == FindPolicy::EmptyIsNotFound {
                    Outcome::NotFound
                } else {
                    Outcome::FoundMany(records)
                }
            }
            Err(e) => self.store_failure("find", e),
        }
    }

    /// Screen and store a new record, echoing what was stored
    pub async fn insert(
        &self,
        record: Value,
        screening: Screening,
    ) -> Result<Outcome, ValidationError> {
        self.screen_payload(&record, screening)?;

        let result = self
            .store
            .insert_one(&self.collection, record, WriteConcern::Acknowledged)
            .await
            .and_then(confirmed);

        Ok(match result {
            Ok(stored) => Outcome::Found(stored),
            Err(e) => self.store_failure("insert", e),
        })
    }

    /// Screen and replace the whole record with the given id. Never upserts.
    pub async fn update(
        &self,
        id: &str,
        record: Value,
        screening: Screening,
    ) -> Result<Outcome, ValidationError> {
        self.screen_payload(&record, screening)?;

        let id = match DocumentId::parse(id) {
            Ok(id) => id,
            Err(e) => return Ok(self.store_failure("update", e)),
        };

        let result = self
            .store
            .replace_one(&self.collection, id, record, WriteConcern::Acknowledged)
            .await
            .and_then(confirmed);

        Ok(match result {
            Ok(Some(document)) => Outcome::Updated { document, count: 1 },
            Ok(None) => Outcome::NotFound,
            Err(e) => self.store_failure("update", e),
        })
    }

    /// Remove the record with the given id
    pub async fn delete(&self, id: &str) -> Outcome {
        let id = match DocumentId::parse(id) {
            Ok(id) => id,
            Err(e) => return self.store_failure("delete", e),
        };

        let result = self
            .store
            .delete_one(&self.collection, id, WriteConcern::Acknowledged)
            .await
            .and_then(confirmed);

        match result {
            Ok(0) => Outcome::NotFound,
            Ok(count) => Outcome::Deleted(count),
            Err(e) => self.store_failure("delete", e),
        }
    }

    fn screen_payload(&self, record: &Value, screening: Screening) -> Result<(), ValidationError> {
        self.screen.screen(record, screening).map_err(|e| {
            warn!(collection = %self.collection, "rejected payload: {}", e);
            e
        })
    }

    fn store_failure(&self, operation: &str, err: StoreError) -> Outcome {
        error!(collection = %self.collection, operation, error = %err, "store operation failed");
        Outcome::from(err)
    }
}

/// Unwrap a receipt, failing if the store did not confirm the write
fn confirmed<T>(receipt: WriteReceipt<T>) -> Result<T, StoreError> {
    if receipt.acknowledged {
        Ok(receipt.value)
    } else {
        Err(StoreError::backend("Write was not acknowledged"))
    }
}
