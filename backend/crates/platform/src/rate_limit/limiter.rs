//! Fixed-window rate limiter

use std::sync::Arc;

use kernel::error::app_error::{AppError, AppResult};
use kernel::time::SharedClock;

use super::{RateLimitConfig, RateLimitResult, RateLimitStore};

/// Counts requests per identifier and enforces a [`RateLimitConfig`]
pub struct RateLimiter<S> {
    store: Arc<S>,
    clock: SharedClock,
}

impl<S> Clone for RateLimiter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: RateLimitStore> RateLimiter<S> {
    pub fn new(store: Arc<S>, clock: SharedClock) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    fn window_key(identifier: &str, config: &RateLimitConfig, now_ms: i64) -> String {
        let window = now_ms.div_euclid(config.window_ms());
        format!("{}:{}:{}", config.scope, identifier, window)
    }

    /// Count one request for `identifier` and report whether it fits
    ///
    /// A store failure fails closed as `ExternalServiceError`.
    pub async fn check_limit(
        &self,
        identifier: &str,
        config: &RateLimitConfig,
    ) -> AppResult<RateLimitResult> {
        let now_ms = self.clock.now_ms();
        let key = Self::window_key(identifier, config, now_ms);

        let counter = self
            .store
            .increment(&key, config.window_ms(), now_ms)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, scope = %config.scope, "Rate limit store failed");
                AppError::external_service("rate_limit_store", "Rate limiting is unavailable")
                    .with_boxed_source(e)
            })?;

        Ok(RateLimitResult {
            allowed: counter.count <= config.max_requests,
            limit: config.max_requests,
            remaining: config.max_requests.saturating_sub(counter.count),
            reset_at_ms: counter.reset_at_ms,
        })
    }

    /// [`check_limit`](Self::check_limit), raising `RateLimitError` on denial
    pub async fn require_rate_limit(
        &self,
        identifier: &str,
        config: &RateLimitConfig,
    ) -> AppResult<RateLimitResult> {
        let result = self.check_limit(identifier, config).await?;
        if result.allowed {
            return Ok(result);
        }

        let retry_after = result.retry_after(self.clock.now_ms());
        let retry_after_secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;

        tracing::warn!(
            identifier = %identifier,
            scope = %config.scope,
            limit = config.max_requests,
            retry_after_secs,
            "Rate limit exceeded"
        );

        Err(AppError::rate_limit(retry_after)
            .with_context("limit", config.max_requests)
            .with_context("remaining", result.remaining)
            .with_context("retryAfter", retry_after_secs))
    }

    /// Drop rolled-over counters
    pub async fn prune_expired(&self) -> AppResult<usize> {
        let removed = self
            .store
            .prune_expired(self.clock.now_ms())
            .await
            .map_err(|e| {
                AppError::external_service("rate_limit_store", "Rate limit pruning failed")
                    .with_boxed_source(e)
            })?;

        tracing::info!(removed, "Pruned expired rate limit windows");
        Ok(removed)
    }
}
