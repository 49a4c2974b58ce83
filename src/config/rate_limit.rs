use serde::Deserialize;

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum number of requests per client within one interval
    pub requests_per_interval: u32,

    /// Length of the window after which a client's count resets, in seconds
    pub interval_seconds: u64,

    /// Maximum number of distinct clients tracked at once
    pub max_tracked_keys: usize,
}

impl RateLimitConfig {
    /// Validate rate limiting configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.requests_per_interval == 0 {
            return Err("RATE_LIMIT_REQUESTS must be greater than 0".to_string());
        }

        if self.interval_seconds == 0 {
            return Err("RATE_LIMIT_INTERVAL_SECONDS must be greater than 0".to_string());
        }

        if self.max_tracked_keys == 0 {
            return Err("RATE_LIMIT_MAX_KEYS must be greater than 0".to_string());
        }

        Ok(())
    }
}
