//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::error::app_error::AppResult;
use kernel::id::UserId;

use crate::domain::entity::profile::Profile;
use crate::domain::value_object::email::Email;

/// Profile store
#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    /// Insert a new profile; a taken email is a `ConflictError`
    async fn create(&self, profile: &Profile) -> AppResult<()>;

    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<Profile>>;

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<Profile>>;
}
