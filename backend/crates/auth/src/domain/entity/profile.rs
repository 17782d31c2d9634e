//! Profile Entity
//!
//! A signed-up account as held by the profile store.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::{
    email::Email, subscription::Subscription, user_role::UserRole,
};

#[derive(Debug, Clone)]
pub struct Profile {
    pub id: UserId,
    pub email: Email,
    pub full_name: String,
    pub company_name: Option<String>,
    pub role: UserRole,
    pub password_hash: HashedPassword,
    /// Absent until the user subscribes
    pub subscription: Option<Subscription>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(
        email: Email,
        full_name: String,
        company_name: Option<String>,
        password_hash: HashedPassword,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            email,
            full_name,
            company_name,
            role: UserRole::default(),
            password_hash,
            subscription: None,
            created_at: now,
            updated_at: now,
        }
    }
}
