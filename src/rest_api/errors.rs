//! # REST API Errors
//!
//! Error types for the REST API module. Not-found is the only 404;
//! parse, validation and store failures all answer 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::guard::ValidationError;
use crate::query::ParseError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    /// Malformed query expression or request body
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Payload refused by the injection guard
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No record matched the target id or query
    #[error("{message}")]
    NotFound { message: String, id: Option<String> },

    /// Store refused or failed the operation
    #[error("{0}")]
    Store(String),
}

impl RestError {
    pub fn not_found(message: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            id: Some(id.into()),
        }
    }

    pub fn no_records() -> Self {
        Self::NotFound {
            message: "No records found.".to_string(),
            id: None,
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::Parse(_) | RestError::Validation(_) | RestError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        let error = err.to_string();
        let id = match err {
            RestError::NotFound { id, .. } => id,
            _ => None,
        };
        Self { error, id }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
