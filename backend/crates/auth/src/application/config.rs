//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::crypto::random_secret;
use platform::rate_limit::RateLimitConfig;

pub const DEFAULT_ISSUER: &str = "tender-alerts";
pub const DEFAULT_AUDIENCE: &str = "tender-alerts-users";
/// 7 days
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Token signing configuration
#[derive(Clone)]
pub struct TokenConfig {
    /// HS256 signing key
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Lifetime of issued tokens
    pub ttl: Duration,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::with_random_secret()
    }
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Create config with a random signing key
    ///
    /// Tokens do not survive a restart.
    pub fn with_random_secret() -> Self {
        Self::new(random_secret(32))
    }

    /// Random key, one-day tokens
    pub fn development() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 3600),
            ..Self::with_random_secret()
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl.as_secs() as i64
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token: TokenConfig,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Shared secret for service-to-service calls; `None` rejects all
    pub service_api_key: Option<String>,
    /// Limit applied to sign-in and sign-up
    pub credentials_rate_limit: RateLimitConfig,
    /// Limit applied to authenticated user endpoints
    pub api_rate_limit: RateLimitConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: TokenConfig::default(),
            password_pepper: None,
            service_api_key: None,
            credentials_rate_limit: RateLimitConfig::auth(),
            api_rate_limit: RateLimitConfig::api(),
        }
    }
}

impl AuthConfig {
    pub fn development() -> Self {
        Self {
            token: TokenConfig::development(),
            ..Default::default()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
