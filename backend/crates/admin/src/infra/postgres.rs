//! PostgreSQL Repository Implementations

use auth::Email;
use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{ActivityLogId, AdminRoleId, UserId};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{activity_log::AdminActivityLog, admin_role::AdminRole};
use crate::domain::repository::{ActivityLogRepository, AdminRoleRepository};
use crate::domain::value_object::{
    admin_action::AdminAction, admin_role_kind::AdminRoleKind, permission::PermissionSet,
};

/// PostgreSQL-backed admin role and activity log repository
#[derive(Clone)]
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_ROLE: &str = r#"
    SELECT
        id,
        user_id,
        email,
        role,
        permissions,
        is_active,
        created_by,
        created_at,
        updated_at
    FROM admin_roles
"#;

// ============================================================================
// Admin Role Repository Implementation
// ============================================================================

impl AdminRoleRepository for PgAdminRepository {
    async fn find_active_by_email(&self, email: &Email) -> AppResult<Option<AdminRole>> {
        let row = sqlx::query_as::<_, AdminRoleRow>(&format!(
            "{SELECT_ROLE} WHERE email = $1 AND is_active = TRUE"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AdminRoleRow::into_role).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<AdminRole>> {
        let row = sqlx::query_as::<_, AdminRoleRow>(&format!("{SELECT_ROLE} WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(AdminRoleRow::into_role).transpose()
    }

    async fn find_by_id(&self, id: &AdminRoleId) -> AppResult<Option<AdminRole>> {
        let row = sqlx::query_as::<_, AdminRoleRow>(&format!("{SELECT_ROLE} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(AdminRoleRow::into_role).transpose()
    }

    async fn list(&self) -> AppResult<Vec<AdminRole>> {
        let rows =
            sqlx::query_as::<_, AdminRoleRow>(&format!("{SELECT_ROLE} ORDER BY created_at DESC"))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(AdminRoleRow::into_role).collect()
    }

    async fn insert(&self, role: &AdminRole) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO admin_roles (
                id,
                user_id,
                email,
                role,
                permissions,
                is_active,
                created_by,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(role.id.as_uuid())
        .bind(role.user_id.as_ref().map(|id| *id.as_uuid()))
        .bind(role.email.as_str())
        .bind(role.role.to_string())
        .bind(role.permissions.to_names())
        .bind(role.is_active)
        .bind(role.created_by.as_ref().map(Email::as_str))
        .bind(role.created_at)
        .bind(role.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, role: &AdminRole) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE admin_roles SET
                role = $2,
                permissions = $3,
                is_active = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(role.id.as_uuid())
        .bind(role.role.to_string())
        .bind(role.permissions.to_names())
        .bind(role.is_active)
        .bind(role.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &AdminRoleId) -> AppResult<bool> {
        let deleted = sqlx::query("DELETE FROM admin_roles WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Activity Log Repository Implementation
// ============================================================================

impl ActivityLogRepository for PgAdminRepository {
    async fn append(&self, entry: &AdminActivityLog) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO admin_activity_logs (
                id,
                admin_email,
                action,
                target_type,
                target_id,
                details,
                ip_address,
                user_agent,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.admin_email.as_str())
        .bind(entry.action.to_string())
        .bind(&entry.target_type)
        .bind(&entry.target_id)
        .bind(&entry.details)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn recent(&self, limit: usize) -> AppResult<Vec<AdminActivityLog>> {
        let rows = sqlx::query_as::<_, ActivityLogRow>(
            r#"
            SELECT
                id,
                admin_email,
                action,
                target_type,
                target_id,
                details,
                ip_address,
                user_agent,
                created_at
            FROM admin_activity_logs
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ActivityLogRow::into_entry).collect()
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AdminRoleRow {
    id: Uuid,
    user_id: Option<Uuid>,
    email: String,
    role: String,
    permissions: Vec<String>,
    is_active: bool,
    created_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdminRoleRow {
    fn into_role(self) -> AppResult<AdminRole> {
        Ok(AdminRole {
            id: AdminRoleId::from_uuid(self.id),
            user_id: self.user_id.map(UserId::from_uuid),
            email: Email::from_db(self.email),
            role: self.role.parse::<AdminRoleKind>()?,
            permissions: PermissionSet::parse(&self.permissions).map_err(|e| {
                AppError::internal(format!("Invalid stored permissions: {}", e.message()))
            })?,
            is_active: self.is_active,
            created_by: self.created_by.map(Email::from_db),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ActivityLogRow {
    id: Uuid,
    admin_email: String,
    action: String,
    target_type: String,
    target_id: Option<String>,
    details: Value,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl ActivityLogRow {
    fn into_entry(self) -> AppResult<AdminActivityLog> {
        Ok(AdminActivityLog {
            id: ActivityLogId::from_uuid(self.id),
            admin_email: Email::from_db(self.admin_email),
            action: self.action.parse::<AdminAction>()?,
            target_type: self.target_type,
            target_id: self.target_id,
            details: self.details,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            created_at: self.created_at,
        })
    }
}
