//! Value Object Module

pub mod admin_action;
pub mod admin_role_kind;
pub mod permission;
