use crate::cache::VideoCache;
use crate::rate_limit::RateLimiter;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Counts from one sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub cache_entries: usize,
    pub rate_limit_buckets: usize,
}

/// Background task that drops expired cache entries and limiter buckets.
///
/// Lookups already ignore expired data; sweeping only keeps memory bounded
/// for keys that are never asked for again.
pub struct Sweeper {
    cache: VideoCache,
    limiter: RateLimiter,
    period: Duration,
    shutdown: watch::Receiver<bool>,
}

impl Sweeper {
    /// Create a new sweeper
    pub fn new(
        cache: VideoCache,
        limiter: RateLimiter,
        period: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            cache,
            limiter,
            period,
            shutdown,
        }
    }

    /// Run the sweeper - ticks until the shutdown flag flips or its sender is dropped
    pub async fn run(mut self) {
        info!(period_secs = self.period.as_secs(), "Background sweeper started");

        let mut ticker = tokio::time::interval(self.period);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep();
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Background sweeper stopped");
    }

    /// Purge everything that has expired
    pub fn sweep(&self) -> SweepReport {
        let report = SweepReport {
            cache_entries: self.cache.purge_expired(),
            rate_limit_buckets: self.limiter.purge_expired(),
        };

        if report != SweepReport::default() {
            debug!(
                cache_entries = report.cache_entries,
                rate_limit_buckets = report.rate_limit_buckets,
                "Swept expired entries"
            );
        }

        report
    }
}

/// Create a shutdown sender and receiver pair
pub fn create_shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Video;

    #[test]
    fn test_sweep_removes_expired() {
        let cache = VideoCache::new(Duration::ZERO);
        let limiter = RateLimiter::new(Duration::ZERO, 10);
        cache.set("videos:a:1", Vec::<Video>::new());
        limiter.check(5, "ip:1").unwrap();

        let (_tx, rx) = create_shutdown_channel();
        let sweeper = Sweeper::new(cache.clone(), limiter.clone(), Duration::from_secs(1), rx);

        let report = sweeper.sweep();
        assert_eq!(report.cache_entries, 1);
        assert_eq!(report.rate_limit_buckets, 1);
        assert!(cache.is_empty());
        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[tokio::test]
    async fn test_sweeper_stops_on_shutdown() {
        let (tx, rx) = create_shutdown_channel();
        let sweeper = Sweeper::new(
            VideoCache::new(Duration::from_secs(60)),
            RateLimiter::new(Duration::from_secs(60), 10),
            Duration::from_secs(3600),
            rx,
        );

        let handle = tokio::spawn(sweeper.run());
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}
