//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use admin::PgAdminRepository;
use admin::domain::{ActivityLogRepository, AdminRoleRepository};
use api::config::AppConfig;
use api::{InMemoryServices, Services, build_router};
use auth::{Email, PgProfileRepository, ProfileRepository};
use axum::Router;
use kernel::time::{SharedClock, SystemClock};
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitStore, RateLimiter};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired rate limit windows are swept
const RATE_LIMIT_PRUNE_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,admin=info,platform=info,kernel=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(environment = %config.environment, "Configuration loaded");

    let clock: SharedClock = Arc::new(SystemClock);

    let app = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let admin_store = Arc::new(PgAdminRepository::new(pool.clone()));
            let services = Services::new(
                &config,
                Arc::new(PgProfileRepository::new(pool)),
                Arc::clone(&admin_store),
                admin_store,
                Arc::new(InMemoryRateLimitStore::new()),
                clock,
            );
            prepare(services, &config).await?
        }
        None => {
            tracing::warn!("DATABASE_URL not set; profiles and admin roles are kept in memory");
            prepare(InMemoryServices::in_memory(&config, clock), &config).await?
        }
    };

    // Start server
    let addr: SocketAddr = config.bind_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Bootstrap admin, background sweeps, router
async fn prepare<P, R, A, L>(
    services: Services<P, R, A, L>,
    config: &AppConfig,
) -> anyhow::Result<Router>
where
    P: ProfileRepository + Sync + 'static,
    R: AdminRoleRepository + Sync + 'static,
    A: ActivityLogRepository + Sync + 'static,
    L: RateLimitStore + Sync + 'static,
{
    if let Some(email) = &config.bootstrap_admin_email {
        let email = Email::new(email.as_str())?;
        if !services.authorizer.ensure_super_admin(email).await? {
            tracing::debug!("Bootstrap admin already holds a role");
        }
    }

    spawn_rate_limit_pruner(services.limiter.clone());

    Ok(build_router(&services, config))
}

fn spawn_rate_limit_pruner<L>(limiter: RateLimiter<L>)
where
    L: RateLimitStore + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(RATE_LIMIT_PRUNE_INTERVAL);
        loop {
            ticker.tick().await;
            match limiter.prune_expired().await {
                Ok(removed) => tracing::debug!(removed, "Rate limit sweep completed"),
                // Errors here should not stop the server
                Err(e) => tracing::warn!(error = %e, "Rate limit sweep failed"),
            }
        }
    });
}
