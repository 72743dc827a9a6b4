//! # CMS Routes
//!
//! Routing table for the collection endpoints under a configurable base path.

use axum::{
    routing::{get, post},
    Router,
};

use super::handler::{
    delete_find_handler, delete_handler, find_handler, get_handler, insert_handler,
    update_find_handler, update_handler, SharedState, FIND_SEGMENT,
};

/// Build the CMS router rooted at `base_path` (e.g. `/cms`)
pub fn cms_routes(state: SharedState, base_path: &str) -> Router {
    Router::new()
        .route(base_path, post(insert_handler))
        .route(
            &format!("{}/{}", base_path, FIND_SEGMENT),
            get(find_handler)
                .put(update_find_handler)
                .delete(delete_find_handler),
        )
        .route(
            &format!("{}/:item_id", base_path),
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .with_state(state)
}
