//! In-memory profile store
//!
//! Used when no database is configured and by tests.

use std::collections::HashMap;
use std::sync::RwLock;

use kernel::error::app_error::{AppError, AppResult};
use kernel::id::UserId;

use crate::domain::entity::profile::Profile;
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::email::Email;

#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<UserId, Profile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a stored profile (subscription changes, role grants)
    pub fn upsert(&self, profile: Profile) -> AppResult<()> {
        self.profiles
            .write()
            .map_err(|_| poisoned())?
            .insert(profile.id, profile);
        Ok(())
    }
}

fn poisoned() -> AppError {
    AppError::internal("profile store lock poisoned")
}

impl ProfileRepository for InMemoryProfileRepository {
    async fn create(&self, profile: &Profile) -> AppResult<()> {
        let mut profiles = self.profiles.write().map_err(|_| poisoned())?;

        if profiles.values().any(|p| p.email == profile.email) {
            return Err(AppError::conflict("Record already exists"));
        }

        profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<Profile>> {
        let profiles = self.profiles.read().map_err(|_| poisoned())?;
        Ok(profiles.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<Profile>> {
        let profiles = self.profiles.read().map_err(|_| poisoned())?;
        Ok(profiles.values().find(|p| &p.email == email).cloned())
    }
}
