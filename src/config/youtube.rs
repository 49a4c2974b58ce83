use serde::Deserialize;

/// YouTube Data API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeConfig {
    /// API credential sent as the `key` query parameter
    pub api_key: String,

    /// Base URL of the Data API (e.g., "https://www.googleapis.com/youtube/v3")
    pub base_url: String,

    /// Timeout applied to every upstream request, in seconds
    pub timeout_seconds: u64,
}

impl YouTubeConfig {
    /// Validate YouTube API configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("YOUTUBE_API_KEY must not be empty".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err("YOUTUBE_API_BASE_URL must be a valid URL".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("YOUTUBE_TIMEOUT_SECONDS must be greater than 0".to_string());
        }

        Ok(())
    }
}
