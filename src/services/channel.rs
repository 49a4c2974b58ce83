//! Channel resolution and upload pagination.

use crate::error::{AppError, AppResult};
use crate::models::Video;
use crate::youtube::{PlaylistEntry, VideoDetails, VideoPlatform, MAX_PAGE_SIZE};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

const ALLOWED_HOSTS: [&str; 2] = ["youtube.com", "www.youtube.com"];

/// Extract the channel handle (without `@`) from a channel URL.
///
/// Only `http(s)://youtube.com/...` and `http(s)://www.youtube.com/...` are
/// accepted; the handle is the first path segment starting with `@`.
///
/// ```
/// use tubescope::services::channel::parse_channel_handle;
///
/// let handle = parse_channel_handle("https://www.youtube.com/@ExampleChannel/videos").unwrap();
/// assert_eq!(handle, "ExampleChannel");
/// assert!(parse_channel_handle("https://vimeo.com/@ExampleChannel").is_err());
/// ```
pub fn parse_channel_handle(raw: &str) -> AppResult<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::InvalidUrl("URL is required".to_string()));
    }

    let url = Url::parse(raw)
        .map_err(|_| AppError::InvalidUrl("Invalid YouTube URL format".to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(AppError::InvalidUrl(
            "URL must start with http:// or https://".to_string(),
        ));
    }

    let host = url.host_str().unwrap_or_default();
    if !ALLOWED_HOSTS.contains(&host) {
        return Err(AppError::InvalidUrl(format!(
            "Unsupported host '{}': expected youtube.com",
            host
        )));
    }

    let encoded = url
        .path_segments()
        .into_iter()
        .flatten()
        .find_map(|segment| segment.strip_prefix('@'))
        .ok_or_else(|| AppError::InvalidUrl("Invalid YouTube URL format".to_string()))?;

    // Path segments stay percent-encoded; handles may be non-ASCII
    let handle = urlencoding::decode(encoded)
        .map_err(|_| AppError::InvalidUrl("Invalid YouTube URL format".to_string()))?;

    if handle.trim().is_empty() {
        return Err(AppError::InvalidUrl("Invalid YouTube URL format".to_string()));
    }

    Ok(handle.into_owned())
}

/// Apply the configured default and upper bound to a requested limit
pub fn bounded_video_limit(
    requested: Option<usize>,
    default_limit: usize,
    max_limit: usize,
) -> AppResult<usize> {
    let limit = requested.unwrap_or(default_limit);

    if limit == 0 {
        return Err(AppError::InvalidInput(
            "videoLimit must be at least 1".to_string(),
        ));
    }

    if limit > max_limit {
        return Err(AppError::InvalidInput(format!(
            "videoLimit must not exceed {}",
            max_limit
        )));
    }

    Ok(limit)
}

/// Upstream view counts are decimal strings; anything else counts as zero
pub fn parse_view_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Combine a playlist entry with its (possibly missing) detail record
fn build_video(entry: PlaylistEntry, details: Option<VideoDetails>) -> Video {
    let (duration, views) = match details {
        Some(d) => (d.duration, parse_view_count(d.view_count.as_deref())),
        None => (None, 0),
    };

    Video {
        title: entry.title,
        url: Video::watch_url(&entry.video_id),
        duration,
        views,
        published_at: entry.published_at,
    }
}

/// Uploads collection a channel resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    pub handle: String,
    pub channel_id: String,
    pub uploads_playlist_id: String,
}

/// Resolves channels and pages through their uploads
#[derive(Clone)]
pub struct ChannelService {
    platform: Arc<dyn VideoPlatform>,
}

impl ChannelService {
    pub fn new(platform: Arc<dyn VideoPlatform>) -> Self {
        Self { platform }
    }

    /// Validate `url` and fetch up to `limit` of the channel's uploads
    pub async fn fetch_channel_videos(&self, url: &str, limit: usize) -> AppResult<Vec<Video>> {
        let handle = parse_channel_handle(url)?;
        self.fetch_handle_videos(&handle, limit).await
    }

    /// Resolve a handle to its channel id and uploads playlist.
    ///
    /// # Errors
    ///
    /// `ChannelNotFound` when the search yields no channel, `PlaylistNotFound`
    /// when the channel exposes no uploads collection.
    pub async fn resolve(&self, handle: &str) -> AppResult<ResolvedChannel> {
        let channel_id = self
            .platform
            .find_channel_id(handle)
            .await?
            .ok_or_else(|| AppError::ChannelNotFound(handle.to_string()))?;

        let uploads_playlist_id = self
            .platform
            .uploads_playlist_id(&channel_id)
            .await?
            .ok_or_else(|| AppError::PlaylistNotFound(channel_id.clone()))?;

        debug!(handle, %channel_id, %uploads_playlist_id, "Resolved channel");

        Ok(ResolvedChannel {
            handle: handle.to_string(),
            channel_id,
            uploads_playlist_id,
        })
    }

    /// Fetch up to `limit` uploads for a handle, newest first as upstream orders them.
    ///
    /// Pages are requested one after another. Details are matched to playlist
    /// entries by video id; an entry without details keeps `duration = None`
    /// and `views = 0`.
    pub async fn fetch_handle_videos(&self, handle: &str, limit: usize) -> AppResult<Vec<Video>> {
        if limit == 0 {
            return Err(AppError::InvalidInput(
                "videoLimit must be at least 1".to_string(),
            ));
        }

        let channel = self.resolve(handle).await?;

        let mut videos: Vec<Video> = Vec::with_capacity(limit.min(MAX_PAGE_SIZE * 4));
        let mut page_token: Option<String> = None;
        let mut consumed_tokens: HashSet<String> = HashSet::new();
        let mut pages = 0usize;

        while videos.len() < limit {
            let remaining = limit - videos.len();
            let max_results = remaining.min(MAX_PAGE_SIZE) as u32;

            let page = self
                .platform
                .playlist_page(&channel.uploads_playlist_id, max_results, page_token.take())
                .await?;
            pages += 1;

            if !page.entries.is_empty() {
                let video_ids: Vec<String> =
                    page.entries.iter().map(|e| e.video_id.clone()).collect();

                let mut details: HashMap<String, VideoDetails> = self
                    .platform
                    .video_details(&video_ids)
                    .await?
                    .into_iter()
                    .map(|d| (d.video_id.clone(), d))
                    .collect();

                let missing = video_ids
                    .iter()
                    .filter(|id| !details.contains_key(id.as_str()))
                    .count();
                if missing > 0 {
                    debug!(missing, "Some videos came back without details");
                }

                videos.extend(
                    page.entries
                        .into_iter()
                        .take(remaining)
                        .map(|entry| {
                            let detail = details.remove(&entry.video_id);
                            build_video(entry, detail)
                        }),
                );
            }

            match page.next_page_token {
                Some(token) if consumed_tokens.insert(token.clone()) => page_token = Some(token),
                Some(token) => {
                    warn!(%token, "Upstream repeated a page token, stopping pagination");
                    break;
                }
                None => break,
            }
        }

        info!(
            handle,
            requested = limit,
            fetched = videos.len(),
            pages,
            "Fetched channel uploads"
        );

        Ok(videos)
    }
}
