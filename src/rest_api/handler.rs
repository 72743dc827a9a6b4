//! # REST API Handlers
//!
//! Orchestration only: pick the parser and screening mode for the request,
//! call the record access layer, map the outcome to a response. No handler
//! talks to the store directly.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::body::parse_json;
use crate::guard::{Screening, BYPASS_PARAM};
use crate::query::{parse_query, ParseError};
use crate::records::{Outcome, RecordAccess};

use super::errors::{RestError, RestResult};
use super::response::{DeleteResponse, UpdateResponse};

/// Query parameter carrying the find expression
pub const QUERY_PARAM: &str = "q";

/// Path segment of the find route
pub const FIND_SEGMENT: &str = "find";

/// State shared by the CMS handlers
pub struct CmsState {
    pub records: RecordAccess,

    /// Whether `script=1` may skip the injection guard
    pub allow_script_bypass: bool,
}

impl CmsState {
    pub fn new(records: RecordAccess) -> Self {
        Self {
            records,
            allow_script_bypass: true,
        }
    }

    pub fn with_script_bypass(mut self, allow: bool) -> Self {
        self.allow_script_bypass = allow;
        self
    }

    fn screening(&self, params: &HashMap<String, String>) -> Screening {
        Screening::from_param(
            params.get(BYPASS_PARAM).map(String::as_str),
            self.allow_script_bypass,
        )
    }
}

/// Shared state type
pub type SharedState = Arc<CmsState>;

/// Map an outcome the operation cannot produce, or a store failure, to a 500
fn unexpected(outcome: Outcome) -> RestError {
    match outcome {
        Outcome::StoreError(message) => RestError::Store(message),
        other => RestError::Store(format!("Unexpected store outcome: {}", other.kind())),
    }
}

/// Get single record handler
pub async fn get_handler(
    State(state): State<SharedState>,
    Path(item_id): Path<String>,
) -> RestResult<Json<Value>> {
    match state.records.get_by_id(&item_id).await {
        Outcome::Found(record) => Ok(Json(record)),
        Outcome::NotFound => Err(RestError::not_found("ID not found.", item_id)),
        other => Err(unexpected(other)),
    }
}

/// Find records handler
pub async fn find_handler(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> RestResult<Json<Vec<Value>>> {
    let raw = params
        .get(QUERY_PARAM)
        .ok_or_else(|| ParseError::query("", "missing query parameter 'q'"))?;
    let query = parse_query(raw)?;

    match state.records.find(&query).await {
        Outcome::FoundMany(records) => Ok(Json(records)),
        Outcome::NotFound => Err(RestError::no_records()),
        other => Err(unexpected(other)),
    }
}

/// Insert record handler
pub async fn insert_handler(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> RestResult<Json<Value>> {
    let record = parse_json(&body)?;
    let screening = state.screening(&params);

    match state.records.insert(record, screening).await? {
        Outcome::Found(stored) => Ok(Json(stored)),
        other => Err(unexpected(other)),
    }
}

/// Update record handler
pub async fn update_handler(
    State(state): State<SharedState>,
    Path(item_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> RestResult<Json<UpdateResponse>> {
    update_record(&state, item_id, &params, &body).await
}

/// `PUT {base}/find`: the static find route shadows `:item_id`
pub async fn update_find_handler(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> RestResult<Json<UpdateResponse>> {
    update_record(&state, FIND_SEGMENT.to_string(), &params, &body).await
}

async fn update_record(
    state: &CmsState,
    item_id: String,
    params: &HashMap<String, String>,
    body: &[u8],
) -> RestResult<Json<UpdateResponse>> {
    let record = parse_json(body)?;
    let screening = state.screening(params);

    match state.records.update(&item_id, record, screening).await? {
        Outcome::Updated { document, count } => Ok(Json(UpdateResponse {
            document,
            updated: count,
        })),
        Outcome::NotFound => Err(RestError::not_found("No record updated", item_id)),
        other => Err(unexpected(other)),
    }
}

/// Delete record handler
pub async fn delete_handler(
    State(state): State<SharedState>,
    Path(item_id): Path<String>,
) -> RestResult<Json<DeleteResponse>> {
    delete_record(&state, item_id).await
}

/// `DELETE {base}/find`
pub async fn delete_find_handler(
    State(state): State<SharedState>,
) -> RestResult<Json<DeleteResponse>> {
    delete_record(&state, FIND_SEGMENT.to_string()).await
}

async fn delete_record(state: &CmsState, item_id: String) -> RestResult<Json<DeleteResponse>> {
    match state.records.delete(&item_id).await {
        Outcome::Deleted(count) => Ok(Json(DeleteResponse {
            id: item_id,
            deleted: count,
        })),
        Outcome::NotFound => Err(RestError::not_found("No record deleted", item_id)),
        other => Err(unexpected(other)),
    }
}
