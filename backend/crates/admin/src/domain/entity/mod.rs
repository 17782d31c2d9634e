//! Entity Module

pub mod activity_log;
pub mod admin_role;
pub mod admin_user;
