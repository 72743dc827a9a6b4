//! # Query Model
//!
//! A query maps top-level field names to clauses. A document matches when
//! every clause matches.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use serde_json::{json, Map, Value};

/// Regex flags accepted after a literal. `i` is implied.
pub const ACCEPTED_FLAGS: &str = "igms";

/// A compiled, case-insensitive pattern match
#[derive(Debug, Clone)]
pub struct PatternMatch {
    pattern: String,
    multi_line: bool,
    dot_matches_new_line: bool,
    regex: Regex,
}

impl PatternMatch {
    /// Compile `pattern` with the given flag letters.
    ///
    /// Matching is always case-insensitive. `g` is accepted and ignored.
    pub fn compile(pattern: &str, flags: &str) -> Result<Self, String> {
        let mut multi_line = false;
        let mut dot_matches_new_line = false;

        for flag in flags.chars() {
            match flag {
                'i' | 'g' => {}
                'm' => multi_line = true,
                's' => dot_matches_new_line = true,
                other => {
                    return Err(format!("unsupported regular expression flag '{}'", other))
                }
            }
        }

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .multi_line(multi_line)
            .dot_matches_new_line(dot_matches_new_line)
            .build()
            .map_err(|e| e.to_string())?;

        Ok(Self {
            pattern: pattern.to_string(),
            multi_line,
            dot_matches_new_line,
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn case_insensitive(&self) -> bool {
        true
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for PatternMatch {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.multi_line == other.multi_line
            && self.dot_matches_new_line == other.dot_matches_new_line
    }
}

/// A single field condition
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Deep equality with a literal value
    Equals(Value),

    /// Regex match against a string value
    Matches(PatternMatch),
}

impl Clause {
    /// Check a field value against this clause.
    ///
    /// Array fields match when any element matches.
    pub fn matches(&self, field_value: &Value) -> bool {
        match self {
            Clause::Equals(expected) => {
                field_value == expected
                    || field_value
                        .as_array()
                        .map(|items| items.contains(expected))
                        .unwrap_or(false)
            }
            Clause::Matches(pattern) => match field_value {
                Value::String(s) => pattern.is_match(s),
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|s| pattern.is_match(s)),
                _ => false,
            },
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Clause::Equals(value) => value.clone(),
            Clause::Matches(pattern) => json!({
                "matches": pattern.pattern(),
                "caseInsensitive": pattern.case_insensitive(),
            }),
        }
    }
}

/// A structured query, combined with AND logic
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    clauses: BTreeMap<String, Clause>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the clause for `field`
    pub fn with(mut self, field: impl Into<String>, clause: Clause) -> Self {
        self.insert(field, clause);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, clause: Clause) {
        self.clauses.insert(field.into(), clause);
    }

    pub fn get(&self, field: &str) -> Option<&Clause> {
        self.clauses.get(field)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Clause)> {
        self.clauses.iter()
    }

    /// Check if a document matches all clauses. A missing field never matches.
    pub fn matches(&self, doc: &Value) -> bool {
        self.clauses.iter().all(|(field, clause)| {
            doc.get(field)
                .map(|value| clause.matches(value))
                .unwrap_or(false)
        })
    }

    /// Render as a JSON object, regex clauses as `{matches, caseInsensitive}`
    pub fn to_value(&self) -> Value {
        let members: Map<String, Value> = self
            .clauses
            .iter()
            .map(|(field, clause)| (field.clone(), clause.to_value()))
            .collect();
        Value::Object(members)
    }
}
