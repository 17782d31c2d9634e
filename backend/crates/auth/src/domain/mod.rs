//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{authenticated_user::AuthenticatedUser, profile::Profile};
pub use repository::ProfileRepository;
pub use value_object::{
    email::Email,
    subscription::{Subscription, SubscriptionStatus},
    token_payload::{TokenPayload, TokenSubject},
    user_role::UserRole,
};
