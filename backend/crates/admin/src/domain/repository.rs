//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use auth::Email;
use kernel::error::app_error::AppResult;
use kernel::id::AdminRoleId;

use crate::domain::entity::{activity_log::AdminActivityLog, admin_role::AdminRole};

/// Admin role store
#[trait_variant::make(AdminRoleRepository: Send)]
pub trait LocalAdminRoleRepository {
    /// Active role for `email`, if any
    async fn find_active_by_email(&self, email: &Email) -> AppResult<Option<AdminRole>>;

    /// Role for `email` regardless of status
    async fn find_by_email(&self, email: &Email) -> AppResult<Option<AdminRole>>;

    async fn find_by_id(&self, id: &AdminRoleId) -> AppResult<Option<AdminRole>>;

    /// All roles, newest first
    async fn list(&self) -> AppResult<Vec<AdminRole>>;

    /// Insert a new role; a taken email is a `ConflictError`
    async fn insert(&self, role: &AdminRole) -> AppResult<()>;

    async fn update(&self, role: &AdminRole) -> AppResult<()>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: &AdminRoleId) -> AppResult<bool>;
}

/// Append-only audit trail
#[trait_variant::make(ActivityLogRepository: Send)]
pub trait LocalActivityLogRepository {
    async fn append(&self, entry: &AdminActivityLog) -> AppResult<()>;

    /// Most recent entries first
    async fn recent(&self, limit: usize) -> AppResult<Vec<AdminActivityLog>>;
}
