//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{activity_log::AdminActivityLog, admin_role::AdminRole, admin_user::AdminUser};
pub use repository::{ActivityLogRepository, AdminRoleRepository};
pub use value_object::{
    admin_action::AdminAction,
    admin_role_kind::AdminRoleKind,
    permission::{Permission, PermissionSet},
};
