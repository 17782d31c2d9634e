//! Admin Backend Module
//!
//! Dashboard authorization: who holds an active admin role, with which
//! permissions, and an audit trail of every role change.
//!
//! - `domain/` - Closed permission vocabulary, roles, activity log
//! - `application/` - [`AdminAuthorizer`]
//! - `infra/` - In-memory and PostgreSQL stores
//! - `presentation/` - Role management routes

pub mod application;
pub mod domain;
pub mod infra;
pub mod presentation;

pub use application::{AdminAuthorizer, AdminConfig};
pub use domain::{AdminRole, AdminUser, Permission, PermissionSet};
pub use infra::{InMemoryActivityLogRepository, InMemoryAdminRoleRepository, PgAdminRepository};
pub use presentation::{AdminAppState, admin_router};
