//! Admin Authorizer
//!
//! Answers "is this identity an active admin, with which permissions" and
//! keeps the audit trail of role changes.
//!
//! Lookups fail closed: a store error reads as "not an admin". Only super
//! admins create, update or delete roles, and never their own. Role
//! mutations are applied first and audited after; a failed audit write is
//! logged and never turns a completed mutation into an error.

use std::sync::Arc;

use auth::{Email, ProfileRepository, TokenService};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::{AppError, AppResult};
use kernel::error::codes;
use kernel::error::kind::ErrorKind;
use kernel::id::{ActivityLogId, AdminRoleId, UserId};
use kernel::time::SharedClock;
use platform::client::{ClientInfo, extract_bearer_token};
use serde_json::json;

use crate::application::config::MAX_ACTIVITY_LOGS;
use crate::domain::entity::{
    activity_log::AdminActivityLog, admin_role::AdminRole, admin_user::AdminUser,
};
use crate::domain::repository::{ActivityLogRepository, AdminRoleRepository};
use crate::domain::value_object::{
    admin_action::AdminAction,
    admin_role_kind::AdminRoleKind,
    permission::{Permission, PermissionSet},
};

const TARGET_ADMIN_ROLE: &str = "admin_role";

/// Role grant request
#[derive(Debug, Clone)]
pub struct NewAdminRole {
    pub email: Email,
    pub role: AdminRoleKind,
    /// `None` grants the tier's defaults
    pub permissions: Option<PermissionSet>,
}

/// Partial role change
#[derive(Debug, Clone, Default)]
pub struct AdminRoleChanges {
    pub role: Option<AdminRoleKind>,
    pub permissions: Option<PermissionSet>,
    pub is_active: Option<bool>,
}

impl AdminRoleChanges {
    fn is_empty(&self) -> bool {
        self.role.is_none() && self.permissions.is_none() && self.is_active.is_none()
    }

    /// Whether applying these changes to `current` takes anything away
    fn reduces(&self, current: &AdminRole) -> bool {
        self.is_active == Some(false)
            || self.role.is_some_and(|r| r < current.role)
            || self
                .permissions
                .as_ref()
                .is_some_and(|p| !p.is_superset(&current.permissions))
    }
}

pub struct AdminAuthorizer<R, A, P> {
    roles: Arc<R>,
    audit: Arc<A>,
    tokens: TokenService<P>,
    clock: SharedClock,
}

impl<R, A, P> Clone for AdminAuthorizer<R, A, P> {
    fn clone(&self) -> Self {
        Self {
            roles: Arc::clone(&self.roles),
            audit: Arc::clone(&self.audit),
            tokens: self.tokens.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, A, P> AdminAuthorizer<R, A, P>
where
    R: AdminRoleRepository,
    A: ActivityLogRepository,
    P: ProfileRepository,
{
    pub fn new(roles: Arc<R>, audit: Arc<A>, tokens: TokenService<P>, clock: SharedClock) -> Self {
        Self {
            roles,
            audit,
            tokens,
            clock,
        }
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Active role for `email`; lookup failures read as "none"
    pub async fn get_admin_role(&self, email: &Email) -> Option<AdminRole> {
        match self.roles.find_active_by_email(email).await {
            Ok(role) => role,
            Err(e) => {
                tracing::warn!(error = %e, "Admin role lookup failed; treating as non-admin");
                None
            }
        }
    }

    pub async fn is_admin(&self, email: &Email) -> bool {
        self.get_admin_role(email).await.is_some()
    }

    /// Empty for non-admins and on lookup failure
    pub async fn get_admin_permissions(&self, email: &Email) -> PermissionSet {
        self.get_admin_role(email)
            .await
            .map(|r| r.permissions)
            .unwrap_or_default()
    }

    // ========================================================================
    // Request gates
    // ========================================================================

    /// Resolve the bearer token into an active admin, or nothing
    pub async fn verify_admin_auth(&self, headers: &HeaderMap) -> Option<AdminUser> {
        let token = extract_bearer_token(headers)?;

        let user = match self.tokens.get_user_from_token(token).await {
            Ok(Some(user)) => user,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!(code = e.code(), "Admin token rejected");
                return None;
            }
        };

        let role = self.get_admin_role(&user.email).await?;

        Some(AdminUser {
            id: user.id,
            email: user.email,
            role: role.role,
            permissions: role.permissions,
        })
    }

    /// First call of every admin route; `Err` is a ready 401 response
    pub async fn require_admin(&self, headers: &HeaderMap) -> Result<AdminUser, Response> {
        self.verify_admin_auth(headers).await.ok_or_else(|| {
            AppError::auth(codes::ADMIN_REQUIRED, "Admin authentication required").into_response()
        })
    }

    #[inline]
    pub fn has_permission(&self, admin: &AdminUser, permission: Permission) -> bool {
        admin.has_permission(permission)
    }

    pub fn require_permission(&self, admin: &AdminUser, permission: Permission) -> AppResult<()> {
        if self.has_permission(admin, permission) {
            return Ok(());
        }

        tracing::warn!(
            admin = %admin.email,
            permission = %permission,
            "Admin lacks permission"
        );
        Err(
            AppError::insufficient_permissions(format!("Missing permission: {permission}"))
                .with_context("permission", permission.as_str()),
        )
    }

    // ========================================================================
    // Role management
    // ========================================================================

    pub async fn list_admin_roles(&self) -> AppResult<Vec<AdminRole>> {
        self.roles.list().await
    }

    /// Most recent entries first, at most `MAX_ACTIVITY_LOGS`
    pub async fn get_activity_logs(&self, limit: usize) -> AppResult<Vec<AdminActivityLog>> {
        self.audit.recent(limit.clamp(1, MAX_ACTIVITY_LOGS)).await
    }

    /// Grant `super_admin` to `email` unless it already holds a role
    ///
    /// Returns whether a role was created. Used once at start-up so a fresh
    /// deployment has someone able to manage admins.
    pub async fn ensure_super_admin(&self, email: Email) -> AppResult<bool> {
        if self.roles.find_by_email(&email).await?.is_some() {
            return Ok(false);
        }

        let mut role = AdminRole::new(email, AdminRoleKind::SuperAdmin, None, None, self.clock.now());
        role.user_id = self.profile_id(&role.email).await;
        self.roles.insert(&role).await?;

        tracing::info!(email = %role.email, "Bootstrap super admin granted");
        Ok(true)
    }

    pub async fn create_admin_role(
        &self,
        actor: &AdminUser,
        new_role: NewAdminRole,
        client: &ClientInfo,
    ) -> AppResult<AdminRole> {
        require_super_admin(actor)?;

        if self.roles.find_by_email(&new_role.email).await?.is_some() {
            return Err(admin_exists());
        }

        let mut role = AdminRole::new(
            new_role.email,
            new_role.role,
            new_role.permissions,
            Some(actor.email.clone()),
            self.clock.now(),
        );
        role.user_id = self.profile_id(&role.email).await;

        self.roles.insert(&role).await.map_err(|e| {
            if e.kind() == ErrorKind::Conflict {
                admin_exists()
            } else {
                e
            }
        })?;

        tracing::info!(
            actor = %actor.email,
            target = %role.email,
            role = %role.role,
            "Admin role created"
        );

        self.record(
            actor,
            AdminAction::RoleCreated,
            Some(role.id),
            json!({
                "email": role.email.as_str(),
                "role": role.role.to_string(),
                "permissions": role.permissions.to_names(),
            }),
            client,
        )
        .await;

        Ok(role)
    }

    pub async fn update_admin_role(
        &self,
        actor: &AdminUser,
        id: &AdminRoleId,
        changes: AdminRoleChanges,
        client: &ClientInfo,
    ) -> AppResult<AdminRole> {
        require_super_admin(actor)?;

        let mut role = self
            .roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Admin role not found"))?;

        if changes.is_empty() {
            return Ok(role);
        }

        if role.email == actor.email {
            let what = if changes.reduces(&role) { "demote or deactivate" } else { "change" };
            return Err(self_modification(what));
        }

        let before = json!({
            "role": role.role.to_string(),
            "permissions": role.permissions.to_names(),
            "isActive": role.is_active,
        });

        if let Some(kind) = changes.role {
            role.role = kind;
        }
        if let Some(permissions) = changes.permissions {
            role.permissions = permissions;
        }
        if let Some(is_active) = changes.is_active {
            role.is_active = is_active;
        }
        role.updated_at = self.clock.now();

        self.roles.update(&role).await?;

        tracing::info!(
            actor = %actor.email,
            target = %role.email,
            role = %role.role,
            is_active = role.is_active,
            "Admin role updated"
        );

        self.record(
            actor,
            AdminAction::RoleUpdated,
            Some(role.id),
            json!({
                "email": role.email.as_str(),
                "before": before,
                "after": {
                    "role": role.role.to_string(),
                    "permissions": role.permissions.to_names(),
                    "isActive": role.is_active,
                },
            }),
            client,
        )
        .await;

        Ok(role)
    }

    pub async fn delete_admin_role(
        &self,
        actor: &AdminUser,
        id: &AdminRoleId,
        client: &ClientInfo,
    ) -> AppResult<()> {
        require_super_admin(actor)?;

        let role = self
            .roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Admin role not found"))?;

        if role.email == actor.email {
            return Err(self_modification("delete"));
        }

        if !self.roles.delete(id).await? {
            return Err(AppError::not_found("Admin role not found"));
        }

        tracing::info!(actor = %actor.email, target = %role.email, "Admin role deleted");

        self.record(
            actor,
            AdminAction::RoleDeleted,
            Some(role.id),
            json!({ "email": role.email.as_str(), "role": role.role.to_string() }),
            client,
        )
        .await;

        Ok(())
    }

    /// Profile behind `email`, if one exists yet
    async fn profile_id(&self, email: &Email) -> Option<UserId> {
        match self.tokens.repo().find_by_email(email).await {
            Ok(profile) => profile.map(|p| p.id),
            Err(e) => {
                tracing::debug!(error = %e, "Profile lookup for admin role failed");
                None
            }
        }
    }

    /// Best-effort audit write
    async fn record(
        &self,
        actor: &AdminUser,
        action: AdminAction,
        target_id: Option<AdminRoleId>,
        details: serde_json::Value,
        client: &ClientInfo,
    ) {
        let entry = AdminActivityLog {
            id: ActivityLogId::new(),
            admin_email: actor.email.clone(),
            action,
            target_type: TARGET_ADMIN_ROLE.to_string(),
            target_id: target_id.map(|id| id.to_string()),
            details,
            ip_address: client.ip.clone(),
            user_agent: client.user_agent.clone(),
            created_at: self.clock.now(),
        };

        if let Err(e) = self.audit.append(&entry).await {
            tracing::error!(
                error = %e,
                action = %action,
                actor = %actor.email,
                "Failed to write admin activity log"
            );
        }
    }
}

fn require_super_admin(actor: &AdminUser) -> AppResult<()> {
    if actor.role == AdminRoleKind::SuperAdmin {
        Ok(())
    } else {
        Err(AppError::insufficient_permissions(
            "Only super admins can manage admin roles",
        ))
    }
}

fn admin_exists() -> AppError {
    AppError::conflict("An admin role already exists for this email").with_code(codes::ADMIN_EXISTS)
}

fn self_modification(what: &str) -> AppError {
    AppError::conflict(format!("Admins cannot {what} their own role"))
        .with_code(codes::SELF_MODIFICATION)
}
