//! # REST API Module
//!
//! HTTP endpoints for get, find, insert, update and delete on the configured
//! collection.

pub mod errors;
pub mod handler;
pub mod response;
pub mod server;

pub use errors::{ErrorResponse, RestError, RestResult};
pub use handler::{CmsState, SharedState};
pub use response::{DeleteResponse, UpdateResponse};
pub use server::cms_routes;
