//! YouTube Data API v3 access.
//!
//! `VideoPlatform` is the seam the paginator talks to; `YouTubeClient` is the
//! real implementation over `reqwest`.

use crate::config::YouTubeConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Largest page the playlistItems and videos endpoints accept
pub const MAX_PAGE_SIZE: usize = 50;

/// One upload reference from a playlist page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub video_id: String,
    pub title: Option<String>,
    pub published_at: Option<String>,
}

/// A page of playlist entries plus the cursor for the next page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistPage {
    pub entries: Vec<PlaylistEntry>,
    pub next_page_token: Option<String>,
}

/// Duration and statistics for a single video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub video_id: String,
    pub duration: Option<String>,
    /// Raw view count; upstream reports it as a decimal string
    pub view_count: Option<String>,
}

/// Operations the channel paginator needs from the video platform
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Resolve a channel handle to a channel id (first search hit only)
    async fn find_channel_id(&self, handle: &str) -> AppResult<Option<String>>;

    /// Look up the uploads playlist of a channel
    async fn uploads_playlist_id(&self, channel_id: &str) -> AppResult<Option<String>>;

    /// Fetch one page of a playlist
    async fn playlist_page(
        &self,
        playlist_id: &str,
        max_results: u32,
        page_token: Option<String>,
    ) -> AppResult<PlaylistPage>;

    /// Fetch details for up to `MAX_PAGE_SIZE` videos in one call
    async fn video_details(&self, video_ids: &[String]) -> AppResult<Vec<VideoDetails>>;
}

// Wire types. Only the fields this crate reads are modelled.

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    id: Option<SearchResultId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResultId {
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Channel {
    content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    snippet: Option<PlaylistItemSnippet>,
    content_details: Option<PlaylistItemContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    title: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemContentDetails {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    id: String,
    content_details: Option<VideoContentDetails>,
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

impl PlaylistItem {
    /// Items without a video id cannot be linked to and are dropped
    fn into_entry(self) -> Option<PlaylistEntry> {
        let video_id = self.content_details?.video_id?;
        let (title, published_at) = match self.snippet {
            Some(snippet) => (snippet.title, snippet.published_at),
            None => (None, None),
        };

        Some(PlaylistEntry {
            video_id,
            title,
            published_at,
        })
    }
}

impl From<VideoResource> for VideoDetails {
    fn from(resource: VideoResource) -> Self {
        VideoDetails {
            video_id: resource.id,
            duration: resource.content_details.and_then(|cd| cd.duration),
            view_count: resource.statistics.and_then(|s| s.view_count),
        }
    }
}

/// HTTP client for the YouTube Data API
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    /// Build a client from configuration
    pub fn new(config: &YouTubeConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `<base_url>/<resource>` and decode the JSON body
    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.base_url, resource);

        tracing::debug!(resource, "Calling YouTube API");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(upstream_error_message(status, &body)));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Extract the API's own error message, falling back to the status code
fn upstream_error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
        .unwrap_or_else(|| {
            format!(
                "YouTube API request failed with status {}",
                status.as_u16()
            )
        })
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn find_channel_id(&self, handle: &str) -> AppResult<Option<String>> {
        let response: ListResponse<SearchResult> = self
            .get(
                "search",
                &[
                    ("part", "snippet".to_string()),
                    ("q", handle.to_string()),
                    ("type", "channel".to_string()),
                    ("maxResults", "1".to_string()),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.id)
            .and_then(|id| id.channel_id))
    }

    async fn uploads_playlist_id(&self, channel_id: &str) -> AppResult<Option<String>> {
        let response: ListResponse<Channel> = self
            .get(
                "channels",
                &[
                    ("part", "contentDetails".to_string()),
                    ("id", channel_id.to_string()),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(|channel| channel.content_details)
            .and_then(|cd| cd.related_playlists)
            .and_then(|rp| rp.uploads))
    }

    async fn playlist_page(
        &self,
        playlist_id: &str,
        max_results: u32,
        page_token: Option<String>,
    ) -> AppResult<PlaylistPage> {
        let mut params = vec![
            ("part", "snippet,contentDetails".to_string()),
            ("playlistId", playlist_id.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let response: ListResponse<PlaylistItem> = self.get("playlistItems", &params).await?;

        let total = response.items.len();
        let entries: Vec<PlaylistEntry> = response
            .items
            .into_iter()
            .filter_map(PlaylistItem::into_entry)
            .collect();

        if entries.len() < total {
            tracing::debug!(
                playlist_id,
                dropped = total - entries.len(),
                "Skipping playlist items without a video id"
            );
        }

        Ok(PlaylistPage {
            entries,
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn video_details(&self, video_ids: &[String]) -> AppResult<Vec<VideoDetails>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let response: ListResponse<VideoResource> = self
            .get(
                "videos",
                &[
                    ("part", "contentDetails,statistics".to_string()),
                    ("id", video_ids.join(",")),
                    ("maxResults", MAX_PAGE_SIZE.to_string()),
                ],
            )
            .await?;

        Ok(response.items.into_iter().map(VideoDetails::from).collect())
    }
}
