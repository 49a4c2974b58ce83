mod cache;
mod cors;
mod rate_limit;
mod scrape;
mod server;
mod youtube;

pub use cache::CacheConfig;
pub use cors::CorsConfig;
pub use rate_limit::RateLimitConfig;
pub use scrape::ScrapeConfig;
pub use server::ServerConfig;
pub use youtube::YouTubeConfig;

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub youtube: YouTubeConfig,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
    pub scrape: ScrapeConfig,
    pub cors: CorsConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let server_port = parse_var(&lookup, "SERVER_PORT", 3000)?;

        let api_key = lookup("YOUTUBE_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::MissingEnvVar("YOUTUBE_API_KEY".to_string()))?;
        let api_base_url = lookup("YOUTUBE_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE_URL.to_string());
        let timeout_seconds = parse_var(&lookup, "YOUTUBE_TIMEOUT_SECONDS", 30)?;

        let cache_enabled = parse_var(&lookup, "CACHE_ENABLED", true)?;
        let cache_ttl = parse_var(&lookup, "CACHE_TTL_SECONDS", 3600)?;
        let sweep_interval = parse_var(&lookup, "CACHE_SWEEP_INTERVAL_SECONDS", 300)?;

        // Rate limit config
        let requests_per_interval = parse_var(&lookup, "RATE_LIMIT_REQUESTS", 10)?;
        let interval_seconds = parse_var(&lookup, "RATE_LIMIT_INTERVAL_SECONDS", 60)?;
        let max_tracked_keys = parse_var(&lookup, "RATE_LIMIT_MAX_KEYS", 500)?;

        let default_video_limit = parse_var(&lookup, "DEFAULT_VIDEO_LIMIT", 100)?;
        let max_video_limit = parse_var(&lookup, "MAX_VIDEO_LIMIT", 500)?;

        // CORS config
        let allowed_origins_str = lookup("ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string());
        let allowed_origins: Vec<String> = if allowed_origins_str == "*" {
            vec!["*".to_string()]
        } else {
            allowed_origins_str
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };

        let config = Config {
            server: ServerConfig {
                host: server_host,
                port: server_port,
            },
            youtube: YouTubeConfig {
                api_key,
                base_url: api_base_url,
                timeout_seconds,
            },
            cache: CacheConfig {
                enabled: cache_enabled,
                ttl_seconds: cache_ttl,
                sweep_interval_seconds: sweep_interval,
            },
            rate_limit: RateLimitConfig {
                requests_per_interval,
                interval_seconds,
                max_tracked_keys,
            },
            scrape: ScrapeConfig {
                default_video_limit,
                max_video_limit,
            },
            cors: CorsConfig { allowed_origins },
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        self.youtube.validate().map_err(AppError::Configuration)?;
        self.cache.validate().map_err(AppError::Configuration)?;
        self.rate_limit.validate().map_err(AppError::Configuration)?;
        self.scrape.validate().map_err(AppError::Configuration)?;
        self.cors.validate().map_err(AppError::Configuration)?;
        Ok(())
    }
}

/// Parse an optional variable, falling back to `default` when it is unset
fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", name))),
        None => Ok(default),
    }
}
