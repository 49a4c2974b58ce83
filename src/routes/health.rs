use crate::routes::types::{CacheHealth, HealthCheckResponse, RateLimiterHealth};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

use super::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        cache: CacheHealth {
            enabled: state.cache_enabled,
            entries: state.cache.len(),
            ttl_seconds: state.cache.ttl().as_secs(),
        },
        rate_limiter: RateLimiterHealth {
            tracked_clients: state.limiter.tracked_keys(),
            requests_per_interval: state.requests_per_interval,
        },
        timestamp: chrono::Utc::now(),
    };

    Json(response)
}
