//! JSON body parsing for write requests.

use serde_json::Value;

use crate::query::{ParseError, ParseResult};

/// Parse a raw request body. The first syntax error wins.
///
/// Bytes that are not UTF-8 are a parse error like any other; the raw text
/// in the error is the lossy decoding.
pub fn parse_json(raw: &[u8]) -> ParseResult<Value> {
    serde_json::from_slice(raw)
        .map_err(|e| ParseError::body(String::from_utf8_lossy(raw), e.to_string()))
}
