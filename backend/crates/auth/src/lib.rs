//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Profiles, token payloads, repository traits
//! - `application/` - Token service, request gates, sign-up / sign-in
//! - `infra/` - In-memory and PostgreSQL profile stores
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Security Model
//! - HS256 bearer tokens bound to an issuer and audience
//! - Expiry is judged by the injected clock, never by the token alone
//! - Passwords hashed with Argon2id and an optional pepper
//! - Headless callers use a separate shared-secret gate with its own code

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{AuthConfig, ServiceKeyGate, TokenConfig, TokenService};
pub use domain::{AuthenticatedUser, Email, ProfileRepository, UserRole};
pub use error::TokenError;
pub use infra::{InMemoryProfileRepository, PgProfileRepository};
pub use presentation::{AuthAppState, auth_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
