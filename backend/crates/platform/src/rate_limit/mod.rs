//! Rate Limiting Infrastructure
//!
//! Fixed-window counting. For a window of `window_ms` the counter for an
//! identifier is keyed by `floor(now / window_ms)`, so it resets exactly at
//! window rollover. A client can therefore burst up to `2 × max_requests`
//! across a boundary; a sliding window would be a behavioral change.
//!
//! The algorithm lives in [`RateLimiter`]; counters live behind
//! [`RateLimitStore`]. [`InMemoryRateLimitStore`] serves a single process.
//! Several instances must share an external counter store implementing the
//! same trait.

mod limiter;
mod memory;

pub use limiter::RateLimiter;
pub use memory::InMemoryRateLimitStore;

use std::borrow::Cow;
use std::time::Duration;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use kernel::error::normalize::BoxError;

pub const HEADER_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const HEADER_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const HEADER_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Rate limit configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Counter namespace, so presets never share counters
    pub scope: Cow<'static, str>,
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::api()
    }
}

impl RateLimitConfig {
    pub fn new(scope: impl Into<Cow<'static, str>>, max_requests: u32, window_secs: u64) -> Self {
        Self {
            scope: scope.into(),
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Sign-in / sign-up: 5 per 15 minutes
    pub fn auth() -> Self {
        Self::new("auth", 5, 15 * 60)
    }

    /// General API: 100 per minute
    pub fn api() -> Self {
        Self::new("api", 100, 60)
    }

    /// Admin dashboard: 30 per minute
    pub fn admin() -> Self {
        Self::new("admin", 30, 60)
    }

    /// Payment endpoints: 10 per minute
    pub fn payment() -> Self {
        Self::new("payment", 10, 60)
    }

    pub fn window_ms(&self) -> i64 {
        (self.window.as_millis() as i64).max(1)
    }
}

/// Counter state after one increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    pub count: u32,
    pub reset_at_ms: i64,
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Time until the window resets, never negative
    pub fn retry_after(&self, now_ms: i64) -> Duration {
        Duration::from_millis((self.reset_at_ms - now_ms).max(0) as u64)
    }

    /// `X-RateLimit-*` headers; reset is in Unix seconds
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_LIMIT, HeaderValue::from(self.limit));
        headers.insert(HEADER_REMAINING, HeaderValue::from(self.remaining));
        headers.insert(
            HEADER_RESET,
            HeaderValue::from(self.reset_at_ms.div_euclid(1000)),
        );
        headers
    }
}

/// Trait for rate limit storage backends
///
/// `increment` must be atomic per key: concurrent calls for the same key
/// observe distinct, consecutive counts.
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Increment the counter for `key`, creating it with
    /// `reset_at_ms = now_ms + window_ms` if absent
    async fn increment(
        &self,
        key: &str,
        window_ms: i64,
        now_ms: i64,
    ) -> Result<WindowCount, BoxError>;

    /// Drop counters whose reset time has passed; returns how many
    async fn prune_expired(&self, now_ms: i64) -> Result<usize, BoxError>;
}
