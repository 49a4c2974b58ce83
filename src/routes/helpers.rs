use crate::cache::VideoCache;
use crate::error::AppResult;
use crate::middleware::RequestContext;
use crate::models::Video;
use crate::services::{bounded_video_limit, parse_channel_handle};

use super::AppState;

/// Rate-limit the caller, then serve the channel's uploads from cache or upstream
pub(crate) async fn collect_videos(
    state: &AppState,
    context: &RequestContext,
    url: &str,
    requested_limit: Option<usize>,
) -> AppResult<Vec<Video>> {
    state
        .limiter
        .check(state.requests_per_interval, &context.rate_limit_key())?;

    let handle = parse_channel_handle(url)?;
    let limit = bounded_video_limit(
        requested_limit,
        state.default_video_limit,
        state.max_video_limit,
    )?;
    let cache_key = VideoCache::videos_key(&handle, limit);

    if state.cache_enabled {
        if let Some(videos) = state.cache.get(&cache_key) {
            tracing::debug!(request_id = %context.request_id, %cache_key, "Cache hit");
            return Ok(videos);
        }
    }

    let videos = state.channels.fetch_handle_videos(&handle, limit).await?;

    if state.cache_enabled {
        state.cache.set(cache_key, videos.clone());
    }

    Ok(videos)
}
