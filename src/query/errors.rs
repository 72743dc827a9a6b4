//! # Parse Errors
//!
//! Error type shared by the query sanitizer and the JSON body parser.

use std::fmt;

use thiserror::Error;

/// Where the offending text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOrigin {
    /// The `q` parameter of a find request
    Query,
    /// A request body
    Body,
}

impl ParseOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseOrigin::Query => "query",
            ParseOrigin::Body => "body",
        }
    }
}

impl fmt::Display for ParseOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Malformed query expression or request body.
///
/// Carries the raw text as received and the underlying parser diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid JSON object passed in {origin}: {raw}. {message}")]
pub struct ParseError {
    pub origin: ParseOrigin,
    pub raw: String,
    pub message: String,
}

impl ParseError {
    pub fn query(raw: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            origin: ParseOrigin::Query,
            raw: raw.into(),
            message: message.into(),
        }
    }

    pub fn body(raw: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            origin: ParseOrigin::Body,
            raw: raw.into(),
            message: message.into(),
        }
    }
}

/// Result type for parsing
pub type ParseResult<T> = Result<T, ParseError>;
