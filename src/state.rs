use crate::cache::VideoCache;
use crate::rate_limit::RateLimiter;
use crate::services::ChannelService;

/// Application state shared across all HTTP handlers.
///
/// Wrapped in `Arc` and handed to every handler through Axum's `State`
/// extractor. The cache and limiter are owned here rather than living in
/// globals, so each router instance (and each test) gets its own.
#[derive(Clone)]
pub struct AppState {
    /// Channel resolution and upload pagination over the video platform
    pub channels: ChannelService,

    /// Fetched uploads keyed by channel handle and limit
    pub cache: VideoCache,

    /// Per-client request limiter
    pub limiter: RateLimiter,

    /// Requests a client may make per limiter interval
    pub requests_per_interval: u32,

    /// Whether `cache` is consulted and filled
    pub cache_enabled: bool,

    /// Limit applied when a request names none
    pub default_video_limit: usize,

    /// Largest limit a request may ask for
    pub max_video_limit: usize,
}
