//! HTTP Handlers
//!
//! Credential handlers validate the body, then rate-limit by client IP, then
//! run their use case; a malformed body never spends the caller's budget.
//! Authenticated handlers resolve the caller first so the limit is keyed per
//! user rather than per IP.
//! Failures are returned as `AppError` and rendered by the error middleware.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use kernel::error::app_error::{AppError, AppResult};
use kernel::error::handler::ApiSuccess;
use platform::client::rate_limit_identifier;
use platform::rate_limit::{RateLimitConfig, RateLimitStore, RateLimiter};
use platform::validation::Validated;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::application::{SignInInput, SignInUseCase, SignUpInput, SignUpUseCase};
use crate::domain::repository::ProfileRepository;
use crate::presentation::dto::{
    AuthResponse, MeResponse, SignInRequest, SignUpRequest, SubscriptionStatusResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<R, L> {
    pub repo: Arc<R>,
    pub tokens: TokenService<R>,
    pub limiter: RateLimiter<L>,
    pub config: Arc<AuthConfig>,
}

impl<R, L> Clone for AuthAppState<R, L> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            tokens: self.tokens.clone(),
            limiter: self.limiter.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<R, L> AuthAppState<R, L>
where
    R: ProfileRepository,
    L: RateLimitStore,
{
    async fn limit(
        &self,
        user_id: Option<&str>,
        headers: &HeaderMap,
        config: &RateLimitConfig,
    ) -> AppResult<HeaderMap> {
        let identifier = rate_limit_identifier(user_id, headers);
        let result = self.limiter.require_rate_limit(&identifier, config).await?;
        Ok(result.headers())
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R, L>(
    State(state): State<AuthAppState<R, L>>,
    headers: HeaderMap,
    body: Result<Validated<SignUpRequest>, AppError>,
) -> AppResult<impl IntoResponse>
where
    R: ProfileRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    let Validated(req) = body?;
    let limit_headers = state
        .limit(None, &headers, &state.config.credentials_rate_limit)
        .await?;

    let use_case = SignUpUseCase::new(
        Arc::clone(&state.repo),
        state.tokens.clone(),
        Arc::clone(&state.config),
    );
    let issued = use_case
        .execute(SignUpInput {
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            company_name: req.company_name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        limit_headers,
        ApiSuccess::new(AuthResponse::from(issued)),
    ))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<R, L>(
    State(state): State<AuthAppState<R, L>>,
    headers: HeaderMap,
    body: Result<Validated<SignInRequest>, AppError>,
) -> AppResult<impl IntoResponse>
where
    R: ProfileRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    let Validated(req) = body?;
    let limit_headers = state
        .limit(None, &headers, &state.config.credentials_rate_limit)
        .await?;

    let use_case = SignInUseCase::new(
        Arc::clone(&state.repo),
        state.tokens.clone(),
        Arc::clone(&state.config),
    );
    let issued = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((limit_headers, ApiSuccess::new(AuthResponse::from(issued))))
}

// ============================================================================
// Current user
// ============================================================================

/// GET /api/auth/me
pub async fn me<R, L>(
    State(state): State<AuthAppState<R, L>>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse>
where
    R: ProfileRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    let user = state.tokens.require_auth(&headers).await?;
    let user_id = user.id.to_string();
    let limit_headers = state
        .limit(Some(&user_id), &headers, &state.config.api_rate_limit)
        .await?;

    Ok((limit_headers, ApiSuccess::<MeResponse>::new(user)))
}

/// GET /api/subscription/status
pub async fn subscription_status<R, L>(
    State(state): State<AuthAppState<R, L>>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse>
where
    R: ProfileRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    let user = state.tokens.require_active_subscription(&headers).await?;
    let user_id = user.id.to_string();
    let limit_headers = state
        .limit(Some(&user_id), &headers, &state.config.api_rate_limit)
        .await?;

    Ok((
        limit_headers,
        ApiSuccess::new(SubscriptionStatusResponse {
            active: true,
            subscription: user.subscription,
        }),
    ))
}
