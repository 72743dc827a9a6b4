//! cms-rest - REST API over a single document collection
//!
//! Request flow: `rest_api` handlers parse the query string (`query`) or
//! body (`body`), screen payloads (`guard`), and call `records`, which talks
//! to a `store::DocumentStore`.

pub mod body;
pub mod cli;
pub mod guard;
pub mod http_server;
pub mod logging;
pub mod query;
pub mod records;
pub mod rest_api;
pub mod store;
