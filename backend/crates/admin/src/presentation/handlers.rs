//! HTTP Handlers
//!
//! Every handler calls `require_admin` first; a refusal is returned as-is.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use auth::{Email, ProfileRepository};
use kernel::error::app_error::{AppError, AppResult};
use kernel::error::handler::ApiSuccess;
use kernel::id::AdminRoleId;
use platform::client::{ClientInfo, rate_limit_identifier};
use platform::rate_limit::{RateLimitStore, RateLimiter};
use platform::validation::Validated;
use serde_json::json;

use crate::application::authorizer::{AdminAuthorizer, AdminRoleChanges, NewAdminRole};
use crate::application::config::{AdminConfig, DEFAULT_ACTIVITY_LOGS};
use crate::domain::entity::admin_user::AdminUser;
use crate::domain::repository::{ActivityLogRepository, AdminRoleRepository};
use crate::domain::value_object::permission::Permission;
use crate::presentation::dto::{ActivityQuery, CreateAdminRoleRequest, UpdateAdminRoleRequest};

/// Shared state for admin handlers
pub struct AdminAppState<R, A, P, L> {
    pub authorizer: AdminAuthorizer<R, A, P>,
    pub limiter: RateLimiter<L>,
    pub config: AdminConfig,
}

impl<R, A, P, L> Clone for AdminAppState<R, A, P, L> {
    fn clone(&self) -> Self {
        Self {
            authorizer: self.authorizer.clone(),
            limiter: self.limiter.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, A, P, L> AdminAppState<R, A, P, L>
where
    R: AdminRoleRepository,
    A: ActivityLogRepository,
    P: ProfileRepository,
    L: RateLimitStore,
{
    /// Admin gate, then the per-admin rate limit
    async fn admit(&self, headers: &HeaderMap) -> Result<(AdminUser, HeaderMap), Response> {
        let admin = self.authorizer.require_admin(headers).await?;

        let identifier = rate_limit_identifier(Some(&admin.id.to_string()), headers);
        let result = self
            .limiter
            .require_rate_limit(&identifier, &self.config.rate_limit)
            .await
            .map_err(IntoResponse::into_response)?;

        Ok((admin, result.headers()))
    }
}

fn parse_role_id(raw: &str) -> AppResult<AdminRoleId> {
    raw.parse()
        .map_err(|_| AppError::validation("id", "Invalid admin role id"))
}

macro_rules! admit {
    ($state:expr, $headers:expr) => {
        match $state.admit(&$headers).await {
            Ok(admitted) => admitted,
            Err(refusal) => return Ok(refusal),
        }
    };
}

/// GET /api/admin/me
pub async fn me<R, A, P, L>(
    State(state): State<AdminAppState<R, A, P, L>>,
    headers: HeaderMap,
) -> AppResult<Response>
where
    R: AdminRoleRepository + Sync + 'static,
    A: ActivityLogRepository + Sync + 'static,
    P: ProfileRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    let (admin, limit_headers) = admit!(state, headers);
    Ok((limit_headers, ApiSuccess::new(admin)).into_response())
}

/// GET /api/admin/roles
pub async fn list_roles<R, A, P, L>(
    State(state): State<AdminAppState<R, A, P, L>>,
    headers: HeaderMap,
) -> AppResult<Response>
where
    R: AdminRoleRepository + Sync + 'static,
    A: ActivityLogRepository + Sync + 'static,
    P: ProfileRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    let (admin, limit_headers) = admit!(state, headers);
    state
        .authorizer
        .require_permission(&admin, Permission::ManageAdmins)?;

    let roles = state.authorizer.list_admin_roles().await?;
    Ok((limit_headers, ApiSuccess::new(roles)).into_response())
}

/// POST /api/admin/roles
pub async fn create_role<R, A, P, L>(
    State(state): State<AdminAppState<R, A, P, L>>,
    headers: HeaderMap,
    body: Result<Validated<CreateAdminRoleRequest>, AppError>,
) -> AppResult<Response>
where
    R: AdminRoleRepository + Sync + 'static,
    A: ActivityLogRepository + Sync + 'static,
    P: ProfileRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    let (admin, limit_headers) = admit!(state, headers);
    state
        .authorizer
        .require_permission(&admin, Permission::ManageAdmins)?;
    let Validated(req) = body?;

    let role = state
        .authorizer
        .create_admin_role(
            &admin,
            NewAdminRole {
                email: Email::new(req.email)?,
                role: req.role,
                permissions: req.permissions,
            },
            &ClientInfo::from_headers(&headers),
        )
        .await?;

    Ok((StatusCode::CREATED, limit_headers, ApiSuccess::new(role)).into_response())
}

/// PATCH /api/admin/roles/{id}
pub async fn update_role<R, A, P, L>(
    State(state): State<AdminAppState<R, A, P, L>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Validated<UpdateAdminRoleRequest>, AppError>,
) -> AppResult<Response>
where
    R: AdminRoleRepository + Sync + 'static,
    A: ActivityLogRepository + Sync + 'static,
    P: ProfileRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    let (admin, limit_headers) = admit!(state, headers);
    state
        .authorizer
        .require_permission(&admin, Permission::ManageAdmins)?;
    let id = parse_role_id(&id)?;
    let Validated(req) = body?;

    let role = state
        .authorizer
        .update_admin_role(
            &admin,
            &id,
            AdminRoleChanges {
                role: req.role,
                permissions: req.permissions,
                is_active: req.is_active,
            },
            &ClientInfo::from_headers(&headers),
        )
        .await?;

    Ok((limit_headers, ApiSuccess::new(role)).into_response())
}

/// DELETE /api/admin/roles/{id}
pub async fn delete_role<R, A, P, L>(
    State(state): State<AdminAppState<R, A, P, L>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response>
where
    R: AdminRoleRepository + Sync + 'static,
    A: ActivityLogRepository + Sync + 'static,
    P: ProfileRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    let (admin, limit_headers) = admit!(state, headers);
    state
        .authorizer
        .require_permission(&admin, Permission::ManageAdmins)?;
    let id = parse_role_id(&id)?;

    state
        .authorizer
        .delete_admin_role(&admin, &id, &ClientInfo::from_headers(&headers))
        .await?;

    Ok((limit_headers, ApiSuccess::new(json!({ "deleted": id }))).into_response())
}

/// GET /api/admin/activity
pub async fn activity<R, A, P, L>(
    State(state): State<AdminAppState<R, A, P, L>>,
    headers: HeaderMap,
    query: Result<Query<ActivityQuery>, QueryRejection>,
) -> AppResult<Response>
where
    R: AdminRoleRepository + Sync + 'static,
    A: ActivityLogRepository + Sync + 'static,
    P: ProfileRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    let (admin, limit_headers) = admit!(state, headers);
    state
        .authorizer
        .require_permission(&admin, Permission::ViewSystemLogs)?;
    let Query(query) = query.map_err(|e| AppError::validation("limit", e.body_text()))?;

    let logs = state
        .authorizer
        .get_activity_logs(query.limit.unwrap_or(DEFAULT_ACTIVITY_LOGS))
        .await?;

    Ok((limit_headers, ApiSuccess::new(logs)).into_response())
}
