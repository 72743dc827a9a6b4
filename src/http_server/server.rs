//! # HTTP Server
//!
//! Wires the configured store into the record access layer and serves the
//! CMS routes plus `/health`.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::records::RecordAccess;
use crate::rest_api::{cms_routes, CmsState};
use crate::store::{open_store, DocumentStore, StoreResult};

use super::config::ServiceConfig;
use super::health::health_routes;

/// HTTP server for the CMS API
pub struct HttpServer {
    config: ServiceConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server, opening the store named by the configuration
    pub fn with_config(config: ServiceConfig) -> StoreResult<Self> {
        let store = open_store(&config.connection_string)?;
        Ok(Self::with_store(config, store))
    }

    /// Create a server over an already opened store
    pub fn with_store(config: ServiceConfig, store: Arc<dyn DocumentStore>) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    fn build_router(config: &ServiceConfig, store: Arc<dyn DocumentStore>) -> Router {
        let records = RecordAccess::new(store, config.collection.clone())
            .with_find_policy(config.find_policy());
        let state = Arc::new(
            CmsState::new(records).with_script_bypass(config.allow_script_bypass),
        );

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .merge(cms_routes(state, &config.base_path))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind the configured address and serve until shutdown
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        info!(
            "CMS API listening on http://{}{} (collection '{}')",
            addr, self.config.base_path, self.config.collection
        );

        axum::serve(listener, self.router).await
    }
}
