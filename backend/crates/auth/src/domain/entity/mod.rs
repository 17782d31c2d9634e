//! Entity Module

pub mod authenticated_user;
pub mod profile;
