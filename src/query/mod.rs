//! # Query Module
//!
//! Parsing and matching of the ad-hoc queries accepted by the find endpoint.

pub mod errors;
pub mod filter;
pub mod parser;
pub mod tokenizer;

pub use errors::{ParseError, ParseOrigin, ParseResult};
pub use filter::{Clause, PatternMatch, Query};
pub use parser::parse_query;
