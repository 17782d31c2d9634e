//! Scheduled maintenance endpoints
//!
//! Called by the scheduler with the service key, never by browsers.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::{Router, routing::post};
use auth::{AppResult, ServiceKeyGate};
use kernel::error::handler::ApiSuccess;
use platform::rate_limit::{RateLimitStore, RateLimiter};
use serde_json::{Value, json};

pub struct CronState<L> {
    pub limiter: RateLimiter<L>,
    pub gate: ServiceKeyGate,
}

impl<L> Clone for CronState<L> {
    fn clone(&self) -> Self {
        Self {
            limiter: self.limiter.clone(),
            gate: self.gate.clone(),
        }
    }
}

pub fn cron_router<L>(state: CronState<L>) -> Router
where
    L: RateLimitStore + Sync + 'static,
{
    Router::new()
        .route("/cron/rate-limit/prune", post(prune_rate_limits::<L>))
        .with_state(state)
}

/// POST /api/cron/rate-limit/prune
async fn prune_rate_limits<L>(
    State(state): State<CronState<L>>,
    headers: HeaderMap,
) -> AppResult<ApiSuccess<Value>>
where
    L: RateLimitStore + Sync + 'static,
{
    state.gate.authenticate_headers(&headers)?;

    let removed = state.limiter.prune_expired().await?;
    tracing::info!(removed, "Expired rate limit windows pruned");

    Ok(ApiSuccess::new(json!({ "removed": removed })))
}
