//! Request gates
//!
//! The checks a handler calls first, before touching any resource.

use axum::http::HeaderMap;
use kernel::error::app_error::{AppError, AppResult};
use kernel::error::codes;
use platform::client::extract_bearer_token;

use crate::application::token_service::TokenService;
use crate::domain::entity::authenticated_user::AuthenticatedUser;
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::subscription::SubscriptionStatus;

impl<R> TokenService<R>
where
    R: ProfileRepository,
{
    /// Resolve the bearer token into a user
    pub async fn require_auth(&self, headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
        let token = extract_bearer_token(headers).ok_or_else(|| {
            AppError::auth(codes::MISSING_TOKEN, "Authentication token is required")
        })?;

        self.get_user_from_token(token)
            .await?
            .ok_or_else(|| AppError::auth(codes::INVALID_TOKEN, "Invalid token"))
    }

    /// [`require_auth`](Self::require_auth) plus the admin role
    pub async fn require_admin_auth(&self, headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
        let user = self.require_auth(headers).await?;

        if !user.role.is_admin() {
            tracing::warn!(user_id = %user.id, role = %user.role, "Admin route refused");
            return Err(AppError::insufficient_permissions("Admin access required"));
        }

        Ok(user)
    }

    /// [`require_auth`](Self::require_auth) plus a paid-up subscription
    pub async fn require_active_subscription(
        &self,
        headers: &HeaderMap,
    ) -> AppResult<AuthenticatedUser> {
        let user = self.require_auth(headers).await?;
        let now = self.clock().now();

        match &user.subscription {
            Some(sub) if sub.is_active_at(now) => Ok(user),
            Some(sub)
                if sub.status == SubscriptionStatus::Expired
                    || sub.status == SubscriptionStatus::Active =>
            {
                Err(AppError::auth(
                    codes::SUBSCRIPTION_EXPIRED,
                    "Subscription has expired",
                ))
            }
            _ => Err(AppError::auth(
                codes::SUBSCRIPTION_REQUIRED,
                "An active subscription is required",
            )),
        }
    }
}
