use crate::services::export::{SortField, SortOrder};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single uploaded video as returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub title: Option<String>,
    pub url: String,
    /// ISO-8601 duration as reported upstream (e.g. "PT4M13S")
    pub duration: Option<String>,
    pub views: u64,
    pub published_at: Option<String>,
}

impl Video {
    /// Public watch URL for a video id
    pub fn watch_url(video_id: &str) -> String {
        format!("https://youtube.com/watch?v={}", video_id)
    }
}

/// Request to fetch a channel's uploads
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,

    #[validate(range(min = 1, message = "videoLimit must be at least 1"))]
    pub video_limit: Option<usize>,

    pub sort_by: Option<SortField>,

    pub order: Option<SortOrder>,
}

/// Response carrying the fetched videos
#[derive(Debug, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub videos: Vec<Video>,
}

/// Query parameters for the CSV export endpoint
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,

    #[validate(range(min = 1, message = "videoLimit must be at least 1"))]
    pub video_limit: Option<usize>,

    pub sort_by: Option<SortField>,

    pub order: Option<SortOrder>,
}
