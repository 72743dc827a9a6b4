//! # HTTP Server Module
//!
//! Combines the CMS routes and the health check into one Axum server.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `{base_path}` - POST insert
//! - `{base_path}/find?q=` - GET find
//! - `{base_path}/:item_id` - GET, PUT, DELETE

pub mod config;
pub mod health;
pub mod server;

pub use config::{ConfigError, ServiceConfig};
pub use server::HttpServer;
