//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::validation::{BodySchema, Schema, schemas};
use serde::{Deserialize, Serialize};

use crate::application::TokenIssued;
use crate::domain::entity::authenticated_user::AuthenticatedUser;
use crate::domain::value_object::{subscription::Subscription, user_role::UserRole};

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub company_name: Option<String>,
}

impl BodySchema for SignUpRequest {
    fn schema() -> &'static Schema {
        schemas::sign_up()
    }
}

// ============================================================================
// Sign In
// ============================================================================

/// Sign in request
#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl BodySchema for SignInRequest {
    fn schema() -> &'static Schema {
        schemas::sign_in()
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub role: UserRole,
}

/// Sign up / sign in response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: ProfileResponse,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<TokenIssued> for AuthResponse {
    fn from(issued: TokenIssued) -> Self {
        let TokenIssued {
            profile,
            token,
            expires_at,
        } = issued;

        Self {
            user: ProfileResponse {
                id: profile.id,
                email: profile.email.to_string(),
                full_name: profile.full_name,
                company_name: profile.company_name,
                role: profile.role,
            },
            token,
            expires_at,
        }
    }
}

/// Current user
pub type MeResponse = AuthenticatedUser;

/// Subscription gate result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusResponse {
    pub active: bool,
    pub subscription: Option<Subscription>,
}
