//! Application Layer
//!
//! Use cases and application services.

use chrono::{DateTime, Utc};

use crate::domain::entity::profile::Profile;

pub mod config;
pub mod gates;
pub mod service_key;
pub mod sign_in;
pub mod sign_up;
pub mod token_service;

// Re-exports
pub use config::{AuthConfig, TokenConfig};
pub use service_key::ServiceKeyGate;
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use token_service::TokenService;

/// Result of a successful sign-up or sign-in
#[derive(Debug, Clone)]
pub struct TokenIssued {
    pub profile: Profile,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
