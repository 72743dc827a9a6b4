//! # Query Sanitizer
//!
//! Turns the untrusted `q` parameter of a find request into a [`Query`].
//!
//! Accepted forms:
//! - strict JSON objects, `{"@subject":"abc"}`: every member is an equality
//!   clause;
//! - one embedded regex literal, `{"name":/foo/i}`, optionally alongside
//!   equality members;
//! - the quoted spelling of the same literal, `{"name":"/foo/i"}`, kept for
//!   clients written against the strict-JSON form.
//!
//! At most one regex clause per query.

use std::borrow::Cow;

use serde_json::Value;

use super::errors::{ParseError, ParseResult};
use super::filter::{Clause, PatternMatch, Query, ACCEPTED_FLAGS};
use super::tokenizer::{self, RegexLiteral};

/// Placeholder spliced over a regex literal before strict parsing
const PLACEHOLDER: &str = "null";

/// Parse a raw query expression.
///
/// A string value shaped like `"/pattern/"` or `"/pattern/flags"` is read
/// as a case-insensitive regex, not an equality: `{"dir":"/home/"}` matches
/// any `dir` containing `home`. Path-like values without a trailing slash
/// (`"/usr/bin"`) stay literal.
pub fn parse_query(raw: &str) -> ParseResult<Query> {
    let literals = tokenizer::scan(raw).map_err(|e| ParseError::query(raw, e))?;
    if literals.len() > 1 {
        return Err(too_many(raw));
    }

    let literal = literals.into_iter().next();
    let text = match &literal {
        Some(lit) => Cow::Owned(splice(raw, lit)),
        None => Cow::Borrowed(raw),
    };

    let value: Value =
        serde_json::from_str(&text).map_err(|e| ParseError::query(raw, e.to_string()))?;
    let members = match value {
        Value::Object(members) => members,
        _ => return Err(ParseError::query(raw, "query must be a JSON object")),
    };

    let mut query = Query::new();
    let mut regex_clauses = 0;

    for (field, value) in members {
        let clause = match value.as_str().and_then(split_quoted_literal) {
            Some((pattern, flags)) => {
                regex_clauses += 1;
                compile(raw, pattern, flags)?
            }
            None => Clause::Equals(value),
        };
        query.insert(field, clause);
    }

    if let Some(lit) = literal {
        regex_clauses += 1;
        let clause = compile(raw, &lit.pattern, &lit.flags)?;
        query.insert(lit.field, clause);
    }

    if regex_clauses > 1 {
        return Err(too_many(raw));
    }

    Ok(query)
}

fn splice(raw: &str, lit: &RegexLiteral) -> String {
    let mut text = String::with_capacity(raw.len());
    text.push_str(&raw[..lit.span.start]);
    text.push_str(PLACEHOLDER);
    text.push_str(&raw[lit.span.end..]);
    text
}

fn compile(raw: &str, pattern: &str, flags: &str) -> ParseResult<Clause> {
    PatternMatch::compile(pattern, flags)
        .map(Clause::Matches)
        .map_err(|e| ParseError::query(raw, e))
}

fn too_many(raw: &str) -> ParseError {
    ParseError::query(raw, "only one regular expression is supported per query")
}

/// Split `"/pattern/flags"` into its parts.
///
/// Only strings that open with a slash, close with a slash followed by
/// accepted flag letters, and carry a non-empty pattern qualify. Anything
/// else (`"/usr/bin"`, `"a/b"`) stays a literal.
fn split_quoted_literal(s: &str) -> Option<(&str, &str)> {
    let rest = s.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (pattern, flags) = (&rest[..close], &rest[close + 1..]);

    if pattern.is_empty() || !flags.chars().all(|c| ACCEPTED_FLAGS.contains(c)) {
        return None;
    }

    Some((pattern, flags))
}
