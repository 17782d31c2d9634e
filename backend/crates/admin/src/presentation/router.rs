//! Admin Router

use auth::ProfileRepository;
use axum::{
    Router,
    routing::{get, patch},
};
use platform::rate_limit::RateLimitStore;

use crate::domain::repository::{ActivityLogRepository, AdminRoleRepository};
use crate::presentation::handlers::{self, AdminAppState};

/// Routes mounted under `/api`
pub fn admin_router<R, A, P, L>(state: AdminAppState<R, A, P, L>) -> Router
where
    R: AdminRoleRepository + Sync + 'static,
    A: ActivityLogRepository + Sync + 'static,
    P: ProfileRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    Router::new()
        .route("/admin/me", get(handlers::me::<R, A, P, L>))
        .route(
            "/admin/roles",
            get(handlers::list_roles::<R, A, P, L>).post(handlers::create_role::<R, A, P, L>),
        )
        .route(
            "/admin/roles/{id}",
            patch(handlers::update_role::<R, A, P, L>).delete(handlers::delete_role::<R, A, P, L>),
        )
        .route("/admin/activity", get(handlers::activity::<R, A, P, L>))
        .with_state(state)
}
