//! Authenticated User
//!
//! A verified token merged with the caller's current profile. Built per
//! request and never persisted.

use kernel::id::UserId;
use serde::Serialize;

use super::profile::Profile;
use crate::domain::value_object::{
    email::Email, subscription::Subscription, token_payload::TokenPayload, user_role::UserRole,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
}

impl AuthenticatedUser {
    /// Identity and role come from the token, subscription from the store
    pub fn from_parts(payload: TokenPayload, profile: &Profile) -> Self {
        Self {
            id: payload.subject_id,
            email: payload.email,
            role: payload.role,
            subscription: profile.subscription.clone(),
        }
    }
}
