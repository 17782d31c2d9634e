//! Identity asserted by a verified token

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::Serialize;

use super::email::Email;
use super::user_role::UserRole;

/// Claims of a token whose signature, issuer, audience and expiry have
/// all been checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    pub subject_id: UserId,
    pub email: Email,
    pub role: UserRole,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// What a caller asks to have signed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub subject_id: UserId,
    pub email: Email,
    pub role: UserRole,
}
