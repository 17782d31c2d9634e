//! Infrastructure Layer
//!
//! Admin role and activity log stores.

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryActivityLogRepository, InMemoryAdminRoleRepository};
pub use postgres::PgAdminRepository;
