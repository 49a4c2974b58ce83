use serde::Deserialize;

/// In-memory result cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Whether fetched video lists are cached
    pub enabled: bool,

    /// Time-to-live for cached entries in seconds
    pub ttl_seconds: u64,

    /// How often expired cache entries and rate limit buckets are swept, in seconds
    pub sweep_interval_seconds: u64,
}

impl CacheConfig {
    /// Validate cache configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.ttl_seconds == 0 {
            return Err("CACHE_TTL_SECONDS must be greater than 0".to_string());
        }

        if self.sweep_interval_seconds == 0 {
            return Err("CACHE_SWEEP_INTERVAL_SECONDS must be greater than 0".to_string());
        }

        Ok(())
    }
}
