//! Admin Role Entity
//!
//! A dashboard grant keyed by the holder's email.

use auth::Email;
use chrono::{DateTime, Utc};
use kernel::id::{AdminRoleId, UserId};
use serde::Serialize;

use crate::domain::value_object::{admin_role_kind::AdminRoleKind, permission::PermissionSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRole {
    pub id: AdminRoleId,
    /// Profile of the holder, once known
    pub user_id: Option<UserId>,
    pub email: Email,
    pub role: AdminRoleKind,
    pub permissions: PermissionSet,
    pub is_active: bool,
    /// Email of the admin who granted the role
    pub created_by: Option<Email>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminRole {
    /// Active role; falls back to the tier's default permissions
    pub fn new(
        email: Email,
        role: AdminRoleKind,
        permissions: Option<PermissionSet>,
        created_by: Option<Email>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AdminRoleId::new(),
            user_id: None,
            email,
            role,
            permissions: permissions.unwrap_or_else(|| role.default_permissions()),
            is_active: true,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}
