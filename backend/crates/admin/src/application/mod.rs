//! Application Layer

pub mod authorizer;
pub mod config;

pub use authorizer::{AdminAuthorizer, AdminRoleChanges, NewAdminRole};
pub use config::AdminConfig;
