//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::UserId;
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::profile::Profile;
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::{
    email::Email,
    subscription::{Subscription, SubscriptionStatus},
    user_role::UserRole,
};

/// PostgreSQL-backed profile repository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_PROFILE: &str = r#"
    SELECT
        id,
        email,
        full_name,
        company_name,
        role,
        password_hash,
        subscription_status,
        subscription_plan,
        subscription_expires_at,
        created_at,
        updated_at
    FROM profiles
"#;

impl ProfileRepository for PgProfileRepository {
    async fn create(&self, profile: &Profile) -> AppResult<()> {
        let subscription = profile.subscription.as_ref();

        sqlx::query(
            r#"
            INSERT INTO profiles (
                id,
                email,
                full_name,
                company_name,
                role,
                password_hash,
                subscription_status,
                subscription_plan,
                subscription_expires_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(profile.email.as_str())
        .bind(&profile.full_name)
        .bind(&profile.company_name)
        .bind(profile.role.code())
        .bind(profile.password_hash.as_phc_string())
        .bind(subscription.map(|s| s.status.to_string()))
        .bind(subscription.map(|s| s.plan.clone()))
        .bind(subscription.map(|s| s.expires_at))
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!("{SELECT_PROFILE} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(ProfileRow::into_profile).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!("{SELECT_PROFILE} WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(ProfileRow::into_profile).transpose()
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    email: String,
    full_name: String,
    company_name: Option<String>,
    role: String,
    password_hash: String,
    subscription_status: Option<String>,
    subscription_plan: Option<String>,
    subscription_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> AppResult<Profile> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash: {e}")))?;

        let subscription = match (
            self.subscription_status,
            self.subscription_plan,
            self.subscription_expires_at,
        ) {
            (Some(status), Some(plan), Some(expires_at)) => Some(Subscription {
                status: status.parse::<SubscriptionStatus>()?,
                plan,
                expires_at,
            }),
            _ => None,
        };

        Ok(Profile {
            id: UserId::from_uuid(self.id),
            email: Email::from_db(self.email),
            full_name: self.full_name,
            company_name: self.company_name,
            role: self.role.parse::<UserRole>()?,
            password_hash,
            subscription,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
