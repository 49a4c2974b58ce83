//! Per-client request counting.
//!
//! Each client token gets a bucket the first time it is seen. The bucket's
//! window is fixed at creation: it resets `interval` after it was opened,
//! regardless of when the later calls arrived. Bursts of up to `2 * limit`
//! are therefore possible across a window boundary.

use crate::error::{AppError, AppResult};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct RateLimitBucket {
    count: u32,
    reset_at: Instant,
}

impl RateLimitBucket {
    fn open(now: Instant, interval: Duration) -> Self {
        Self {
            count: 0,
            reset_at: now + interval,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.reset_at
    }
}

/// Fixed-window request limiter keyed by client token
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<DashMap<String, RateLimitBucket>>,
    interval: Duration,
    max_tracked_keys: usize,
}

impl RateLimiter {
    /// Create a limiter whose buckets reset `interval` after they are opened
    pub fn new(interval: Duration, max_tracked_keys: usize) -> Self {
        Self {
            buckets: Arc::new(DashMap::new()),
            interval,
            max_tracked_keys: max_tracked_keys.max(1),
        }
    }

    /// Count one request for `token`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::RateLimitExceeded` when `token` has already made
    /// `limit` requests in its current window. A rejected call does not
    /// consume any of the next window's quota.
    pub fn check(&self, limit: u32, token: &str) -> AppResult<()> {
        self.check_at(limit, token, Instant::now())
    }

    pub(crate) fn check_at(&self, limit: u32, token: &str, now: Instant) -> AppResult<()> {
        if !self.buckets.contains_key(token) && self.buckets.len() >= self.max_tracked_keys {
            self.make_room(now);
        }

        let mut bucket = self
            .buckets
            .entry(token.to_string())
            .or_insert_with(|| RateLimitBucket::open(now, self.interval));

        if bucket.is_expired(now) {
            *bucket = RateLimitBucket::open(now, self.interval);
        }

        if bucket.count >= limit {
            let wait = bucket.reset_at.saturating_duration_since(now);
            return Err(AppError::RateLimitExceeded {
                retry_after_secs: wait.as_secs_f64().ceil().max(1.0) as u64,
            });
        }

        bucket.count += 1;
        Ok(())
    }

    /// Drop every bucket whose window has elapsed, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub(crate) fn purge_expired_at(&self, now: Instant) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| !bucket.is_expired(now));
        before.saturating_sub(self.buckets.len())
    }

    /// Number of client tokens currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }

    /// Free a slot for a new token: expired buckets first, then the one closest to reset
    fn make_room(&self, now: Instant) {
        if self.purge_expired_at(now) > 0 {
            return;
        }

        let oldest = self
            .buckets
            .iter()
            .min_by_key(|entry| entry.value().reset_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            tracing::debug!(token = %key, "Evicting rate limit bucket to stay within capacity");
            self.buckets.remove(&key);
        }
    }
}
