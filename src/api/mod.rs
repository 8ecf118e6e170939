//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::service::LedgerService;

pub use middleware::ApiKeyRegistry;
pub use routes::create_router;

/// Shared state for every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub ledger: LedgerService,
    pub api_keys: Arc<ApiKeyRegistry>,
}

impl AppState {
    pub fn new(ledger: LedgerService, api_keys: ApiKeyRegistry) -> Self {
        Self {
            ledger,
            api_keys: Arc::new(api_keys),
        }
    }
}

/// Build the application router
pub fn build_app(state: AppState) -> Router {
    // Layers run last-added first: logging -> auth -> handler
    let protected_routes = create_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::logging_middleware));

    Router::new()
        // Health check (no auth)
        .route("/health", get(health_check))
        .nest("/api/v1", protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
