//! Admin configuration

use platform::rate_limit::RateLimitConfig;

/// Upper bound on one activity-log page
pub const MAX_ACTIVITY_LOGS: usize = 100;
pub const DEFAULT_ACTIVITY_LOGS: usize = 50;

#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Limit applied per admin to every admin route
    pub rate_limit: RateLimitConfig,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::admin(),
        }
    }
}
