//! lifehub-server: backing process for the Life Hub dashboard
//!
//! Provides:
//! - `POST /save-data` to overwrite the status document
//! - `POST /push-to-github` to write and publish it through git
//! - `GET /data/status.json` to read it, creating the default if absent
//! - Static files for the dashboard itself

pub mod config;
pub mod routes;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use lifehub_core::sync::SyncGateway;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

pub use config::{ConfigError, ServerConfig};

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<SyncGateway>,
}

impl AppState {
    pub fn new(gateway: SyncGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

/// Create the router
pub fn create_router(state: AppState, web_root: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/save-data", post(routes::save_data))
        .route("/push-to-github", post(routes::push_to_github))
        .route("/data/status.json", get(routes::status_document))
        // Health check
        .route("/health", get(routes::health))
        // Everything else is the dashboard
        .fallback_service(ServeDir::new(web_root.as_ref()))
        .layer(middleware::from_fn(routes::hide_dotfiles))
        .with_state(state)
}
