//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use platform::rate_limit::RateLimitStore;

use crate::domain::repository::ProfileRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Routes mounted under `/api`
pub fn auth_router<R, L>(state: AuthAppState<R, L>) -> Router
where
    R: ProfileRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    Router::new()
        .route("/auth/signup", post(handlers::sign_up::<R, L>))
        .route("/auth/signin", post(handlers::sign_in::<R, L>))
        .route("/auth/me", get(handlers::me::<R, L>))
        .route(
            "/subscription/status",
            get(handlers::subscription_status::<R, L>),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use kernel::error::codes;
    use kernel::time::{ManualClock, SharedClock};
    use platform::rate_limit::{InMemoryRateLimitStore, RateLimitConfig, RateLimiter};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::application::{AuthConfig, TokenService};
    use crate::infra::memory::InMemoryProfileRepository;

    fn app(credentials_limit: u32) -> Router {
        let clock: SharedClock = Arc::new(ManualClock::new(1_700_000_000_000));
        let repo = Arc::new(InMemoryProfileRepository::new());
        let config = AuthConfig {
            credentials_rate_limit: RateLimitConfig::new("auth", credentials_limit, 60),
            ..AuthConfig::development()
        };
        let tokens = TokenService::new(repo.clone(), Arc::new(config.token.clone()), clock.clone());

        auth_router(AuthAppState {
            repo,
            tokens,
            limiter: RateLimiter::new(Arc::new(InMemoryRateLimitStore::new()), clock),
            config: Arc::new(config),
        })
    }

    fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn sign_up_body() -> String {
        json!({
            "email": "Bidder@Example.com",
            "password": "Tender#2024",
            "fullName": "Bidder One",
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_sign_up_then_me() {
        let app = app(10);

        let response = app
            .clone()
            .oneshot(post("/auth/signup", sign_up_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-ratelimit-remaining"], "9");

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["user"]["email"], "bidder@example.com");
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["role"], "user");
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let response = app(10)
            .oneshot(post("/auth/signin", "{\"email\": "))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], codes::VALIDATION_ERROR);
    }

    #[tokio::test]
    async fn test_sign_in_is_rate_limited() {
        let app = app(2);
        let body = json!({ "email": "x@example.com", "password": "whatever" }).to_string();

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post("/auth/signin", body.clone()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = app.oneshot(post("/auth/signin", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], codes::RATE_LIMIT_EXCEEDED);
    }
}
