use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub cache: CacheHealth,
    pub rate_limiter: RateLimiterHealth,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Result cache status
#[derive(Debug, Serialize)]
pub struct CacheHealth {
    pub enabled: bool,
    pub entries: usize,
    pub ttl_seconds: u64,
}

/// Rate limiter status
#[derive(Debug, Serialize)]
pub struct RateLimiterHealth {
    pub tracked_clients: usize,
    pub requests_per_interval: u32,
}
