//! Server startup, shutdown, and background task wiring.
//!
//! This module contains the `run_server` function which handles:
//! - YouTube client construction
//! - Cache and rate limiter creation
//! - Application state and router creation
//! - Server binding and graceful shutdown
//! - Sweeper spawning and cleanup

use crate::cache::VideoCache;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::jobs::{create_shutdown_channel, Sweeper};
use crate::rate_limit::RateLimiter;
use crate::routes;
use crate::services::ChannelService;
use crate::state::AppState;
use crate::youtube::{VideoPlatform, YouTubeClient};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Build shared state from configuration around the given video platform.
pub fn build_state(config: &Config, platform: Arc<dyn VideoPlatform>) -> AppState {
    AppState {
        channels: ChannelService::new(platform),
        cache: VideoCache::new(Duration::from_secs(config.cache.ttl_seconds)),
        limiter: RateLimiter::new(
            Duration::from_secs(config.rate_limit.interval_seconds),
            config.rate_limit.max_tracked_keys,
        ),
        requests_per_interval: config.rate_limit.requests_per_interval,
        cache_enabled: config.cache.enabled,
        default_video_limit: config.scrape.default_video_limit,
        max_video_limit: config.scrape.max_video_limit,
    }
}

/// Run the web server with the given configuration.
///
/// # Arguments
///
/// * `config` - The application configuration
/// * `addr` - The address to bind the server to (e.g., "127.0.0.1:3000")
///
/// # Errors
///
/// This function will return an error if:
/// - The HTTP client cannot be built
/// - Server binding fails
/// - Server runtime error occurs
pub async fn run_server(config: Config, addr: String) -> AppResult<()> {
    info!("Starting tubescope server...");

    let client = YouTubeClient::new(&config.youtube)?;
    info!(base_url = %config.youtube.base_url, "YouTube client ready");

    let state = Arc::new(build_state(&config, Arc::new(client)));

    // Start background sweeper in separate task
    let (shutdown_tx, shutdown_rx) = create_shutdown_channel();
    let sweeper = Sweeper::new(
        state.cache.clone(),
        state.limiter.clone(),
        Duration::from_secs(config.cache.sweep_interval_seconds),
        shutdown_rx,
    );
    let sweeper_handle = tokio::spawn(sweeper.run());

    // Create router
    let app = routes::create_router(state, &config.cors);

    // Start server
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("Server listening on {}", addr);
    info!(
        cache_enabled = config.cache.enabled,
        cache_ttl_secs = config.cache.ttl_seconds,
        rate_limit = config.rate_limit.requests_per_interval,
        rate_limit_interval_secs = config.rate_limit.interval_seconds,
        "Request limits configured"
    );

    // Run server with graceful shutdown
    // Peer addresses key the rate limiter when no proxy header is present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(create_shutdown_signal())
    .await
    .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    // Stop the sweeper and wait for it
    let _ = shutdown_tx.send(true);
    sweeper_handle.await.unwrap_or_else(|e| {
        error!("Sweeper task failed: {:?}", e);
    });

    info!("Server shutdown complete");
    Ok(())
}

/// Create a future that resolves when a shutdown signal is received.
///
/// On Unix-like systems, this listens for both Ctrl+C (SIGINT) and SIGTERM.
/// On other platforms, it only listens for Ctrl+C.
///
/// # Panics
///
/// Panics if signal handler installation fails; without it graceful
/// shutdown is impossible.
async fn create_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    info!("Shutdown signal received");
}
