pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use catalog_store::Store;

use crate::state::AppState;

/// The full HTTP application over `store`, serving products from `collection`.
pub fn app(store: Arc<dyn Store>, collection: impl Into<String>) -> Router {
    routes::router().with_state(AppState::new(store, collection))
}
