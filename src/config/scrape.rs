use serde::Deserialize;

/// Limits applied to channel video requests
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Number of videos fetched when a request does not name a limit
    pub default_video_limit: usize,

    /// Largest limit a single request may ask for
    pub max_video_limit: usize,
}

impl ScrapeConfig {
    /// Validate scrape configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_video_limit == 0 {
            return Err("MAX_VIDEO_LIMIT must be at least 1".to_string());
        }

        if self.default_video_limit == 0 || self.default_video_limit > self.max_video_limit {
            return Err("DEFAULT_VIDEO_LIMIT must be between 1 and MAX_VIDEO_LIMIT".to_string());
        }

        Ok(())
    }
}
