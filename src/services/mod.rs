pub mod channel;
pub mod duration;
pub mod export;

pub use channel::{bounded_video_limit, parse_channel_handle, ChannelService, ResolvedChannel};
pub use export::{apply_sort, sort_videos, videos_to_csv, SortField, SortOrder, SortState};
