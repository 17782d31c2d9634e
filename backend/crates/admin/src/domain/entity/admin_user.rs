//! Resolved admin identity

use auth::Email;
use kernel::id::UserId;
use serde::Serialize;

use crate::domain::value_object::{
    admin_role_kind::AdminRoleKind,
    permission::{Permission, PermissionSet},
};

/// A signed-in user holding an active admin role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: UserId,
    pub email: Email,
    pub role: AdminRoleKind,
    pub permissions: PermissionSet,
}

impl AdminUser {
    #[inline]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }
}
