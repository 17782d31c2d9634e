//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - The closed error taxonomy, its codes and the client exposure policy
//! - The error normalizer and (feature `axum`) the API error handler
//! - Validation violation types shared by every schema check
//! - Common primitives (typed IDs, clock, environment)
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod codes;
    pub mod conversions;
    #[cfg(feature = "axum")]
    pub mod handler;
    pub mod kind;
    pub mod normalize;
    pub mod safe;
    pub mod validation;
}
pub mod env;
pub mod id;
pub mod time;
