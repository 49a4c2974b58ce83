use crate::config::CorsConfig;
use crate::middleware::{request_context_middleware, request_id_middleware};
use axum::middleware;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::export_handlers;
use super::health;
use super::scrape_handlers;
use super::AppState;

/// Request bodies are a URL and a few options
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Create application router
pub fn create_router(state: Arc<AppState>, cors_config: &CorsConfig) -> axum::Router {
    // Configure CORS with specific origins
    let cors = if cors_config.allows_any() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<http::HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|s| s.parse::<http::HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // `/api` duplicates `/api/scrape` for older clients
    let api_routes = axum::Router::new()
        .route("/api/scrape", post(scrape_handlers::scrape_videos))
        .route("/api", post(scrape_handlers::scrape_videos))
        .route("/api/export", get(export_handlers::export_csv));

    // Health check endpoint (no rate limiting)
    let health_routes = axum::Router::new().route("/_health", get(health::health_check));

    // Later layers wrap earlier ones: request ids are assigned before the context is built
    api_routes
        .merge(health_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn(request_context_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
