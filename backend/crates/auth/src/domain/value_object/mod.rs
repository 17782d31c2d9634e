//! Value Object Module

pub mod email;
pub mod subscription;
pub mod token_payload;
pub mod user_role;
