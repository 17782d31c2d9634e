//! Dashboard role tiers

use std::str::FromStr;

use derive_more::Display;
use kernel::error::app_error::AppError;
use serde::{Deserialize, Serialize};

use super::permission::{Permission, PermissionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum AdminRoleKind {
    #[display("moderator")]
    Moderator,
    #[display("admin")]
    Admin,
    #[display("super_admin")]
    SuperAdmin,
}

const MODERATOR_PERMISSIONS: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewUsers,
    Permission::ViewAnalytics,
];

const ADMIN_EXTRA_PERMISSIONS: &[Permission] = &[
    Permission::ViewPayments,
    Permission::ViewApiLogs,
    Permission::ManageUsers,
    Permission::ManagePayments,
    Permission::ManageSubscriptions,
    Permission::ExportData,
];

impl AdminRoleKind {
    pub const NAMES: [&'static str; 3] = ["moderator", "admin", "super_admin"];

    /// Permissions granted when a role is created without an explicit list
    pub fn default_permissions(&self) -> PermissionSet {
        match self {
            AdminRoleKind::Moderator => MODERATOR_PERMISSIONS.iter().copied().collect(),
            AdminRoleKind::Admin => MODERATOR_PERMISSIONS
                .iter()
                .chain(ADMIN_EXTRA_PERMISSIONS)
                .copied()
                .collect(),
            AdminRoleKind::SuperAdmin => PermissionSet::all(),
        }
    }
}

impl FromStr for AdminRoleKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            other => Err(AppError::validation(
                "role",
                format!("Unknown admin role: {other}"),
            )),
        }
    }
}
