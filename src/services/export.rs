//! Sorting and CSV export of fetched videos.

use crate::error::{AppError, AppResult};
use crate::models::Video;
use crate::services::duration::{format_duration, parse_duration_seconds};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cmp::Ordering;

/// File name offered for CSV downloads
pub const CSV_FILE_NAME: &str = "youtube_videos.csv";

const CSV_HEADERS: [&str; 5] = ["Title", "URL", "Duration", "Views", "Published Date"];

/// Column a video list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[serde(alias = "publishedAt", alias = "published")]
    PublishedAt,
    Views,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flip(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Current sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::PublishedAt,
            order: SortOrder::Desc,
        }
    }
}

impl SortState {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Selecting the active column flips its direction; a new column starts descending
    pub fn select(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.order.flip())
        } else {
            Self::new(field, SortOrder::Desc)
        }
    }
}

/// Publish time in milliseconds since the epoch; missing or invalid sorts as 0
fn published_key(video: &Video) -> i64 {
    video
        .published_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

fn duration_key(video: &Video) -> u64 {
    video
        .duration
        .as_deref()
        .and_then(parse_duration_seconds)
        .unwrap_or(0)
}

fn compare(a: &Video, b: &Video, field: SortField) -> Ordering {
    match field {
        SortField::PublishedAt => published_key(a).cmp(&published_key(b)),
        SortField::Views => a.views.cmp(&b.views),
        SortField::Duration => duration_key(a).cmp(&duration_key(b)),
    }
}

/// Stable in-place sort by the given state
pub fn sort_videos(videos: &mut [Video], state: SortState) {
    videos.sort_by(|a, b| {
        let ordering = compare(a, b, state.field);
        match state.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Sort only when the caller asked for it; `order` alone defaults the field
pub fn apply_sort(videos: &mut [Video], sort_by: Option<SortField>, order: Option<SortOrder>) {
    if sort_by.is_none() && order.is_none() {
        return;
    }

    let default = SortState::default();
    let state = SortState::new(
        sort_by.unwrap_or(default.field),
        order.unwrap_or(default.order),
    );
    sort_videos(videos, state);
}

/// Publish date as `YYYY-MM-DD`; unparseable values are kept as-is
fn format_published(published_at: Option<&str>) -> String {
    match published_at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc).format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => String::new(),
    }
}

/// Serialize videos, in their current order, as CSV.
///
/// Text fields are always double-quoted and embedded quotes are doubled.
pub fn videos_to_csv(videos: &[Video]) -> AppResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::NonNumeric)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;

    for video in videos {
        let duration = video
            .duration
            .as_deref()
            .map(format_duration)
            .unwrap_or_default();

        writer.write_record([
            video.title.as_deref().unwrap_or(""),
            video.url.as_str(),
            duration.as_str(),
            video.views.to_string().as_str(),
            format_published(video.published_at.as_deref()).as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, views: u64, duration: Option<&str>, published: Option<&str>) -> Video {
        Video {
            title: Some(format!("Video {}", id)),
            url: Video::watch_url(id),
            duration: duration.map(str::to_string),
            views,
            published_at: published.map(str::to_string),
        }
    }

    fn ids(videos: &[Video]) -> Vec<&str> {
        videos
            .iter()
            .map(|v| v.url.trim_start_matches("https://youtube.com/watch?v="))
            .collect()
    }

    #[test]
    fn test_apply_sort_without_params_keeps_order() {
        let mut videos = vec![video("a", 1, None, None), video("b", 2, None, None)];
        apply_sort(&mut videos, None, None);
        assert_eq!(ids(&videos), vec!["a", "b"]);
    }

    #[test]
    fn test_apply_sort_field_defaults_to_desc() {
        let mut videos = vec![video("a", 1, None, None), video("b", 2, None, None)];
        apply_sort(&mut videos, Some(SortField::Views), None);
        assert_eq!(ids(&videos), vec!["b", "a"]);
    }

    #[test]
    fn test_apply_sort_order_defaults_to_published() {
        let mut videos = vec![
            video("new", 1, None, Some("2024-03-01T00:00:00Z")),
            video("old", 2, None, Some("2023-03-01T00:00:00Z")),
        ];
        apply_sort(&mut videos, None, Some(SortOrder::Asc));
        assert_eq!(ids(&videos), vec!["old", "new"]);
    }

    #[test]
    fn test_select_toggles_same_field() {
        let state = SortState::new(SortField::Views, SortOrder::Desc);
        assert_eq!(state.select(SortField::Views).order, SortOrder::Asc);
        assert_eq!(
            state.select(SortField::Views).select(SortField::Views).order,
            SortOrder::Desc
        );
    }

    #[test]
    fn test_select_new_field_resets_to_desc() {
        let state = SortState::new(SortField::Views, SortOrder::Asc);
        let next = state.select(SortField::Duration);
        assert_eq!(next, SortState::new(SortField::Duration, SortOrder::Desc));
    }

    #[test]
    fn test_sort_by_views() {
        let mut videos = vec![
            video("a", 10, None, None),
            video("b", 300, None, None),
            video("c", 5, None, None),
        ];

        sort_videos(&mut videos, SortState::new(SortField::Views, SortOrder::Desc));
        assert_eq!(ids(&videos), vec!["b", "a", "c"]);

        sort_videos(&mut videos, SortState::new(SortField::Views, SortOrder::Asc));
        assert_eq!(ids(&videos), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sort_by_duration() {
        let mut videos = vec![
            video("short", 0, Some("PT45S"), None),
            video("long", 0, Some("PT1H2M3S"), None),
            video("mid", 0, Some("PT5M"), None),
            video("unknown", 0, None, None),
        ];

        sort_videos(&mut videos, SortState::new(SortField::Duration, SortOrder::Asc));
        assert_eq!(ids(&videos), vec!["unknown", "short", "mid", "long"]);
    }

    #[test]
    fn test_sort_by_published_missing_is_epoch() {
        let mut videos = vec![
            video("old", 0, None, Some("2020-01-01T00:00:00Z")),
            video("none", 0, None, None),
            video("new", 0, None, Some("2024-06-01T12:00:00Z")),
        ];

        sort_videos(&mut videos, SortState::default());
        assert_eq!(ids(&videos), vec!["new", "old", "none"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut videos = vec![
            video("first", 1, None, None),
            video("second", 1, None, None),
        ];
        sort_videos(&mut videos, SortState::new(SortField::Views, SortOrder::Asc));
        assert_eq!(ids(&videos), vec!["first", "second"]);
    }

    #[test]
    fn test_csv_output() {
        let mut quoted = video("q1", 1234, Some("PT1H2M3S"), Some("2024-03-05T10:00:00Z"));
        quoted.title = Some(r#"Say "hello""#.to_string());

        let csv = videos_to_csv(&[quoted]).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            r#""Title","URL","Duration","Views","Published Date""#
        );
        assert_eq!(
            lines.next().unwrap(),
            r#""Say ""hello""","https://youtube.com/watch?v=q1","1:02:03",1234,"2024-03-05""#
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_missing_fields() {
        let mut bare = video("b", 0, None, None);
        bare.title = None;

        let csv = videos_to_csv(&[bare]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, r#""","https://youtube.com/watch?v=b","",0,"""#);
    }

    #[test]
    fn test_serde_sort_field_names() {
        let field: SortField = serde_json::from_str(r#""published_at""#).unwrap();
        assert_eq!(field, SortField::PublishedAt);
        let field: SortField = serde_json::from_str(r#""publishedAt""#).unwrap();
        assert_eq!(field, SortField::PublishedAt);
        let order: SortOrder = serde_json::from_str(r#""asc""#).unwrap();
        assert_eq!(order, SortOrder::Asc);
    }
}
