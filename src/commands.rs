//! One-shot CLI commands.
//!
//! These run the channel paginator directly, without the HTTP layer, rate
//! limiter, or cache.

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{ScrapeResponse, Video};
use crate::services::{apply_sort, bounded_video_limit, parse_channel_handle, videos_to_csv};
use crate::services::{ChannelService, SortField, SortOrder};
use crate::youtube::{VideoPlatform, YouTubeClient};
use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Output encoding for `fetch`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

/// Arguments for the `fetch` command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Channel URL, e.g. https://www.youtube.com/@ChannelName/videos
    pub url: String,

    /// Maximum number of videos to fetch (defaults to DEFAULT_VIDEO_LIMIT)
    #[arg(long, short)]
    pub limit: Option<usize>,

    /// Column to sort by
    #[arg(long, value_enum)]
    pub sort_by: Option<SortField>,

    /// Sort direction
    #[arg(long, value_enum)]
    pub order: Option<SortOrder>,

    /// Output encoding
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Fetch a channel's uploads and print or save them.
pub async fn fetch(config: Config, args: FetchArgs) -> AppResult<()> {
    let client = YouTubeClient::new(&config.youtube)?;
    fetch_with(config, args, Arc::new(client)).await
}

async fn fetch_with(
    config: Config,
    args: FetchArgs,
    platform: Arc<dyn VideoPlatform>,
) -> AppResult<()> {
    let service = ChannelService::new(platform);
    let limit = bounded_video_limit(
        args.limit,
        config.scrape.default_video_limit,
        config.scrape.max_video_limit,
    )?;

    info!(url = %args.url, limit, "Fetching channel uploads");
    let mut videos = service.fetch_channel_videos(&args.url, limit).await?;
    apply_sort(&mut videos, args.sort_by, args.order);

    let rendered = render(videos, args.format)?;

    match args.output {
        Some(path) => {
            write_output(&path, &rendered)?;
            info!(path = %path.display(), "Wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Resolve a channel URL and print its ids.
pub async fn resolve(config: Config, url: String) -> AppResult<()> {
    let service = ChannelService::new(Arc::new(YouTubeClient::new(&config.youtube)?));
    let handle = parse_channel_handle(&url)?;
    let channel = service.resolve(&handle).await?;

    println!("handle:      @{}", channel.handle);
    println!("channel id:  {}", channel.channel_id);
    println!("uploads id:  {}", channel.uploads_playlist_id);

    Ok(())
}

fn render(videos: Vec<Video>, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&ScrapeResponse { videos })?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => videos_to_csv(&videos),
    }
}

fn write_output(path: &Path, contents: &str) -> AppResult<()> {
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::youtube::{MockVideoPlatform, PlaylistEntry, PlaylistPage, VideoDetails};

    fn sample() -> Vec<Video> {
        vec![Video {
            title: Some("Intro".to_string()),
            url: Video::watch_url("abc"),
            duration: Some("PT5M".to_string()),
            views: 7,
            published_at: Some("2024-02-01T08:00:00Z".to_string()),
        }]
    }

    #[test]
    fn test_render_json() {
        let out = render(sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["videos"][0]["views"], 7);
    }

    #[test]
    fn test_render_csv() {
        let out = render(sample(), OutputFormat::Csv).unwrap();
        assert!(out.starts_with("\"Title\""));
        assert!(out.contains("\"05:00\",7,\"2024-02-01\""));
    }

    #[tokio::test]
    async fn test_fetch_rejects_limit_above_max() {
        let config = Config::from_lookup(|name| match name {
            "YOUTUBE_API_KEY" => Some("key".to_string()),
            "MAX_VIDEO_LIMIT" => Some("100".to_string()),
            _ => None,
        })
        .unwrap();
        let args = FetchArgs {
            url: "https://www.youtube.com/@ExampleChannel".to_string(),
            limit: Some(101),
            sort_by: None,
            order: None,
            format: OutputFormat::Json,
            output: None,
        };

        let mut platform = MockVideoPlatform::new();
        platform.expect_find_channel_id().never();

        let result = fetch_with(config, args, Arc::new(platform)).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_fetch_sorts_and_writes_csv() {
        let config = Config::from_lookup(|name| match name {
            "YOUTUBE_API_KEY" => Some("key".to_string()),
            _ => None,
        })
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let args = FetchArgs {
            url: "https://www.youtube.com/@ExampleChannel".to_string(),
            limit: Some(2),
            sort_by: Some(SortField::Views),
            order: Some(SortOrder::Asc),
            format: OutputFormat::Csv,
            output: Some(path.clone()),
        };

        let mut platform = MockVideoPlatform::new();
        platform
            .expect_find_channel_id()
            .returning(|_| Ok(Some("UC1".to_string())));
        platform
            .expect_uploads_playlist_id()
            .returning(|_| Ok(Some("UU1".to_string())));
        platform
            .expect_playlist_page()
            .withf(|_, max, _| *max == 2)
            .times(1)
            .returning(|_, _, _| {
                Ok(PlaylistPage {
                    entries: ["high", "low"]
                        .iter()
                        .map(|id| PlaylistEntry {
                            video_id: id.to_string(),
                            title: Some(id.to_string()),
                            published_at: None,
                        })
                        .collect(),
                    next_page_token: None,
                })
            });
        platform.expect_video_details().returning(|ids| {
            Ok(ids
                .iter()
                .map(|id| VideoDetails {
                    video_id: id.clone(),
                    duration: Some("PT1M".to_string()),
                    view_count: Some(if id == "high" { "90" } else { "3" }.to_string()),
                })
                .collect())
        });

        fetch_with(config, args, Arc::new(platform)).await.unwrap();

        let csv = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("watch?v=low"));
        assert!(lines[2].contains("watch?v=high"));
    }

    #[test]
    fn test_write_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("youtube_videos.csv");

        write_output(&path, "a,b\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n");
    }
}
