//! Process configuration
//!
//! Read once at start-up from the environment (after `.env` is loaded).

use std::net::SocketAddr;
use std::time::Duration;

use admin::AdminConfig;
use auth::{AuthConfig, TokenConfig};
use kernel::env::Environment;
use platform::rate_limit::RateLimitConfig;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
pub const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

/// Longest token lifetime accepted from the environment (one year)
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;
/// Longest rate-limit window accepted from the environment (30 days)
pub const MAX_RATE_LIMIT_WINDOW_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),

    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub bind_addr: SocketAddr,
    /// `None` runs on in-memory stores
    pub database_url: Option<String>,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
    pub frontend_origins: Vec<String>,
    /// Email granted `super_admin` at start-up when no role exists for it
    pub bootstrap_admin_email: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match get("APP_ENV") {
            Some(raw) => raw.parse::<Environment>().map_err(|reason| ConfigError::Invalid {
                key: "APP_ENV",
                value: raw,
                reason,
            })?,
            None => Environment::default(),
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = parse("BIND_ADDR", bind_raw)?;

        let mut token = match get("JWT_SECRET") {
            Some(secret) => TokenConfig::new(secret),
            None if environment.is_production() => return Err(ConfigError::Missing("JWT_SECRET")),
            None => {
                tracing::warn!("JWT_SECRET not set; using a random signing key");
                TokenConfig::development()
            }
        };
        if let Some(issuer) = get("JWT_ISSUER") {
            token.issuer = issuer;
        }
        if let Some(audience) = get("JWT_AUDIENCE") {
            token.audience = audience;
        }
        if let Some(raw) = get("JWT_TTL_SECS") {
            token.ttl = Duration::from_secs(parse_bounded("JWT_TTL_SECS", raw, MAX_TOKEN_TTL_SECS)?);
        }

        let mut api_rate_limit = RateLimitConfig::api();
        if let Some(raw) = get("RATE_LIMIT_MAX_REQUESTS") {
            api_rate_limit.max_requests =
                parse_bounded("RATE_LIMIT_MAX_REQUESTS", raw, u64::from(u32::MAX))? as u32;
        }
        if let Some(raw) = get("RATE_LIMIT_WINDOW_SECS") {
            api_rate_limit.window = Duration::from_secs(parse_bounded(
                "RATE_LIMIT_WINDOW_SECS",
                raw,
                MAX_RATE_LIMIT_WINDOW_SECS,
            )?);
        }

        let auth = AuthConfig {
            token,
            password_pepper: get("PASSWORD_PEPPER").map(String::into_bytes),
            service_api_key: get("SERVICE_API_KEY"),
            api_rate_limit,
            ..AuthConfig::default()
        };

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            environment,
            bind_addr,
            database_url: get("DATABASE_URL"),
            auth,
            admin: AdminConfig::default(),
            frontend_origins,
            bootstrap_admin_email: get("ADMIN_BOOTSTRAP_EMAIL"),
        })
    }

    /// In-memory, random-key configuration for tests
    pub fn test() -> Self {
        Self {
            environment: Environment::Test,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: None,
            auth: AuthConfig::development(),
            admin: AdminConfig::default(),
            frontend_origins: Vec::new(),
            bootstrap_admin_email: None,
        }
    }
}

fn parse<T>(key: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value: raw,
    })
}

fn parse_positive(key: &'static str, raw: String) -> Result<u64, ConfigError> {
    match parse::<u64>(key, raw.clone())? {
        0 => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "must be greater than zero".to_string(),
        }),
        n => Ok(n),
    }
}

/// Positive and no larger than `max`
fn parse_bounded(key: &'static str, raw: String, max: u64) -> Result<u64, ConfigError> {
    match parse_positive(key, raw.clone())? {
        n if n > max => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: format!("must be at most {max}"),
        }),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.bind_addr.port(), 31113);
        assert!(config.database_url.is_none());
        assert!(config.auth.service_api_key.is_none());
        assert_eq!(config.auth.token.issuer, "tender-alerts");
        assert_eq!(config.frontend_origins.len(), 2);
    }

    #[test]
    fn test_production_requires_secret() {
        let err = config(&[("APP_ENV", "production")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));

        let config = config(&[("APP_ENV", "production"), ("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.auth.token.secret, "s3cret");
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("JWT_TTL_SECS", "3600"),
            ("JWT_AUDIENCE", "dashboard"),
            ("RATE_LIMIT_MAX_REQUESTS", "2"),
            ("RATE_LIMIT_WINDOW_SECS", "60"),
            ("SERVICE_API_KEY", "cron"),
            ("DATABASE_URL", "postgres://localhost/tenders"),
        ])
        .unwrap();

        assert_eq!(config.auth.token.ttl_secs(), 3600);
        assert_eq!(config.auth.token.audience, "dashboard");
        assert_eq!(config.auth.api_rate_limit.max_requests, 2);
        assert_eq!(config.auth.api_rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.auth.service_api_key.as_deref(), Some("cron"));
        assert!(config.database_url.is_some());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config(&[("JWT_TTL_SECS", "0")]),
            Err(ConfigError::Invalid { key: "JWT_TTL_SECS", .. })
        ));
        assert!(config(&[("BIND_ADDR", "nowhere")]).is_err());
        assert!(config(&[("APP_ENV", "staging")]).is_err());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert!(matches!(
            config(&[("RATE_LIMIT_MAX_REQUESTS", "4294967296")]),
            Err(ConfigError::Invalid { key: "RATE_LIMIT_MAX_REQUESTS", .. })
        ));
        assert!(matches!(
            config(&[("JWT_TTL_SECS", "18446744073709551615")]),
            Err(ConfigError::Invalid { key: "JWT_TTL_SECS", .. })
        ));
        assert!(matches!(
            config(&[("JWT_TTL_SECS", &(MAX_TOKEN_TTL_SECS + 1).to_string())]),
            Err(ConfigError::Invalid { key: "JWT_TTL_SECS", .. })
        ));
        assert!(matches!(
            config(&[("RATE_LIMIT_WINDOW_SECS", "9999999999999")]),
            Err(ConfigError::Invalid { key: "RATE_LIMIT_WINDOW_SECS", .. })
        ));

        let accepted = config(&[
            ("RATE_LIMIT_MAX_REQUESTS", "4294967295"),
            ("JWT_TTL_SECS", &MAX_TOKEN_TTL_SECS.to_string()),
        ])
        .unwrap();
        assert_eq!(accepted.auth.api_rate_limit.max_requests, u32::MAX);
        assert_eq!(accepted.auth.token.ttl_secs(), MAX_TOKEN_TTL_SECS as i64);
    }
}
