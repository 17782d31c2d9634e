//! API Application
//!
//! Composes the auth and admin routers behind the shared request pipeline:
//! request id, tracing, CORS, error normalization and panic capture.
//!
//! Services are constructed once and shared by every handler.

pub mod config;
pub mod cron;

use std::any::Any;
use std::sync::Arc;

use admin::domain::{ActivityLogRepository, AdminRoleRepository};
use admin::{
    AdminAppState, AdminAuthorizer, InMemoryActivityLogRepository, InMemoryAdminRoleRepository,
    admin_router,
};
use auth::{
    AppError, AuthAppState, InMemoryProfileRepository, ProfileRepository, ServiceKeyGate,
    TokenService, auth_router,
};
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Router, middleware};
use kernel::error::handler::{ApiSuccess, ErrorHandler, REQUEST_ID_HEADER, handle_api_errors};
use kernel::time::SharedClock;
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitStore, RateLimiter};
use serde_json::{Value, json};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::cron::{CronState, cron_router};

/// Process-wide services
pub struct Services<P, R, A, L> {
    pub profiles: Arc<P>,
    pub tokens: TokenService<P>,
    pub authorizer: AdminAuthorizer<R, A, P>,
    pub limiter: RateLimiter<L>,
}

impl<P, R, A, L> Services<P, R, A, L>
where
    P: ProfileRepository,
    R: AdminRoleRepository,
    A: ActivityLogRepository,
    L: RateLimitStore,
{
    pub fn new(
        config: &AppConfig,
        profiles: Arc<P>,
        roles: Arc<R>,
        audit: Arc<A>,
        rate_limits: Arc<L>,
        clock: SharedClock,
    ) -> Self {
        let tokens = TokenService::new(
            Arc::clone(&profiles),
            Arc::new(config.auth.token.clone()),
            Arc::clone(&clock),
        );
        let authorizer = AdminAuthorizer::new(roles, audit, tokens.clone(), Arc::clone(&clock));
        let limiter = RateLimiter::new(rate_limits, clock);

        Self {
            profiles,
            tokens,
            authorizer,
            limiter,
        }
    }
}

pub type InMemoryServices = Services<
    InMemoryProfileRepository,
    InMemoryAdminRoleRepository,
    InMemoryActivityLogRepository,
    InMemoryRateLimitStore,
>;

impl InMemoryServices {
    pub fn in_memory(config: &AppConfig, clock: SharedClock) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryProfileRepository::new()),
            Arc::new(InMemoryAdminRoleRepository::new()),
            Arc::new(InMemoryActivityLogRepository::new()),
            Arc::new(InMemoryRateLimitStore::new()),
            clock,
        )
    }
}

/// Full HTTP application
pub fn build_router<P, R, A, L>(services: &Services<P, R, A, L>, config: &AppConfig) -> Router
where
    P: ProfileRepository + Sync + 'static,
    R: AdminRoleRepository + Sync + 'static,
    A: ActivityLogRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    let auth_state = AuthAppState {
        repo: Arc::clone(&services.profiles),
        tokens: services.tokens.clone(),
        limiter: services.limiter.clone(),
        config: Arc::new(config.auth.clone()),
    };
    let admin_state = AdminAppState {
        authorizer: services.authorizer.clone(),
        limiter: services.limiter.clone(),
        config: config.admin.clone(),
    };
    let cron_state = CronState {
        limiter: services.limiter.clone(),
        gate: ServiceKeyGate::new(config.auth.service_api_key.clone()),
    };

    let api = Router::new()
        .merge(auth_router(auth_state))
        .merge(admin_router(admin_state))
        .merge(cron_router(cron_state));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let error_handler = Arc::new(ErrorHandler::new(config.environment));

    // Outermost layer last: request id, trace, CORS, errors, panics
    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            error_handler,
            handle_api_errors,
        ))
        .layer(cors_layer(&config.frontend_origins))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(auth::application::service_key::SERVICE_KEY_HEADER),
        ]))
        .allow_credentials(true)
}

async fn health() -> ApiSuccess<Value> {
    ApiSuccess::new(json!({ "status": "ok" }))
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    tracing::error!(panic = %detail, "Handler panicked");

    AppError::internal("Handler panicked").into_response()
}
