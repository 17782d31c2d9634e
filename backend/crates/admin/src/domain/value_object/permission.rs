//! Permission vocabulary
//!
//! The set is closed: a permission string outside it cannot be parsed,
//! deserialized or persisted.

use std::collections::BTreeSet;
use std::str::FromStr;

use derive_more::Display;
use kernel::error::app_error::AppError;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    #[display("view_dashboard")]
    ViewDashboard,
    #[display("view_users")]
    ViewUsers,
    #[display("view_payments")]
    ViewPayments,
    #[display("view_analytics")]
    ViewAnalytics,
    #[display("view_api_logs")]
    ViewApiLogs,
    #[display("manage_users")]
    ManageUsers,
    #[display("manage_payments")]
    ManagePayments,
    #[display("manage_subscriptions")]
    ManageSubscriptions,
    #[display("view_system_logs")]
    ViewSystemLogs,
    #[display("manage_admins")]
    ManageAdmins,
    #[display("system_settings")]
    SystemSettings,
    #[display("dangerous_operations")]
    DangerousOperations,
    #[display("export_data")]
    ExportData,
}

impl Permission {
    pub const ALL: [Permission; 13] = [
        Permission::ViewDashboard,
        Permission::ViewUsers,
        Permission::ViewPayments,
        Permission::ViewAnalytics,
        Permission::ViewApiLogs,
        Permission::ManageUsers,
        Permission::ManagePayments,
        Permission::ManageSubscriptions,
        Permission::ViewSystemLogs,
        Permission::ManageAdmins,
        Permission::SystemSettings,
        Permission::DangerousOperations,
        Permission::ExportData,
    ];

    /// Wire names, in declaration order
    pub const NAMES: [&'static str; 13] = [
        "view_dashboard",
        "view_users",
        "view_payments",
        "view_analytics",
        "view_api_logs",
        "manage_users",
        "manage_payments",
        "manage_subscriptions",
        "view_system_logs",
        "manage_admins",
        "system_settings",
        "dangerous_operations",
        "export_data",
    ];

    pub fn as_str(&self) -> &'static str {
        Self::NAMES[*self as usize]
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .position(|name| *name == s)
            .map(|i| Self::ALL[i])
            .ok_or_else(|| {
                AppError::validation("permissions", format!("Unknown permission: {s}"))
            })
    }
}

/// A role's granted permissions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Permission::ALL.into_iter().collect()
    }

    /// Parse stored or submitted names, rejecting anything outside the vocabulary
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, AppError> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn is_superset(&self, other: &PermissionSet) -> bool {
        self.0.is_superset(&other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    pub fn to_names(&self) -> Vec<String> {
        self.iter().map(|p| p.as_str().to_string()).collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Permission> for PermissionSet {
    fn extend<I: IntoIterator<Item = Permission>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
