//! # Records Module
//!
//! The record access layer and the outcomes it reports.

pub mod access;
pub mod outcome;

pub use access::{FindPolicy, RecordAccess};
pub use outcome::Outcome;
