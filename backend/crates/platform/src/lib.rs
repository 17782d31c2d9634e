//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Rate limiting (fixed-window limiter, pluggable counter store)
//! - Input validation (schemas, sanitizer, malicious-input gate, uploads)
//! - Client identification from request headers
//! - Cryptographic utilities (SHA-256, constant-time comparison)
//! - Password hashing (Argon2id)

pub mod client;
pub mod crypto;
pub mod password;
pub mod rate_limit;
pub mod validation;
