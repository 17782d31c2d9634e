//! In-memory admin stores
//!
//! Used when no database is configured and by tests.

use std::collections::HashMap;
use std::sync::RwLock;

use auth::Email;
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::AdminRoleId;

use crate::domain::entity::{activity_log::AdminActivityLog, admin_role::AdminRole};
use crate::domain::repository::{ActivityLogRepository, AdminRoleRepository};

fn poisoned() -> AppError {
    AppError::internal("admin store lock poisoned")
}

#[derive(Debug, Default)]
pub struct InMemoryAdminRoleRepository {
    roles: RwLock<HashMap<AdminRoleId, AdminRole>>,
}

impl InMemoryAdminRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a role without going through the authorizer
    pub fn seed(&self, role: AdminRole) -> AppResult<()> {
        self.roles
            .write()
            .map_err(|_| poisoned())?
            .insert(role.id, role);
        Ok(())
    }
}

impl AdminRoleRepository for InMemoryAdminRoleRepository {
    async fn find_active_by_email(&self, email: &Email) -> AppResult<Option<AdminRole>> {
        let roles = self.roles.read().map_err(|_| poisoned())?;
        Ok(roles
            .values()
            .find(|r| r.is_active && &r.email == email)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<AdminRole>> {
        let roles = self.roles.read().map_err(|_| poisoned())?;
        Ok(roles.values().find(|r| &r.email == email).cloned())
    }

    async fn find_by_id(&self, id: &AdminRoleId) -> AppResult<Option<AdminRole>> {
        let roles = self.roles.read().map_err(|_| poisoned())?;
        Ok(roles.get(id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<AdminRole>> {
        let roles = self.roles.read().map_err(|_| poisoned())?;
        let mut all: Vec<AdminRole> = roles.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn insert(&self, role: &AdminRole) -> AppResult<()> {
        let mut roles = self.roles.write().map_err(|_| poisoned())?;
        if roles.values().any(|r| r.email == role.email) {
            return Err(AppError::conflict("Record already exists"));
        }
        roles.insert(role.id, role.clone());
        Ok(())
    }

    async fn update(&self, role: &AdminRole) -> AppResult<()> {
        let mut roles = self.roles.write().map_err(|_| poisoned())?;
        match roles.get_mut(&role.id) {
            Some(slot) => {
                *slot = role.clone();
                Ok(())
            }
            None => Err(AppError::not_found("Record not found")),
        }
    }

    async fn delete(&self, id: &AdminRoleId) -> AppResult<bool> {
        let mut roles = self.roles.write().map_err(|_| poisoned())?;
        Ok(roles.remove(id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryActivityLogRepository {
    entries: RwLock<Vec<AdminActivityLog>>,
}

impl InMemoryActivityLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActivityLogRepository for InMemoryActivityLogRepository {
    async fn append(&self, entry: &AdminActivityLog) -> AppResult<()> {
        self.entries
            .write()
            .map_err(|_| poisoned())?
            .push(entry.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> AppResult<Vec<AdminActivityLog>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.iter().rev().take(limit).cloned().collect())
    }
}
