//! Service-key gate
//!
//! A flat shared-secret check for headless callers such as scheduled jobs.
//! It is not a user token and never shares token error codes.

use axum::http::HeaderMap;
use kernel::error::app_error::{AppError, AppResult};
use kernel::error::codes;
use platform::client::extract_bearer_token;
use platform::crypto::secrets_match;

/// Header carrying the service key
pub const SERVICE_KEY_HEADER: &str = "x-service-key";

#[derive(Clone, Default)]
pub struct ServiceKeyGate {
    key: Option<String>,
}

impl std::fmt::Debug for ServiceKeyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceKeyGate")
            .field("configured", &self.key.is_some())
            .finish()
    }
}

impl ServiceKeyGate {
    /// `None` or an empty key rejects every caller
    pub fn new(key: Option<String>) -> Self {
        Self {
            key: key.filter(|k| !k.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    /// Compare `presented` against the configured key
    pub fn authenticate_admin(&self, presented: Option<&str>) -> AppResult<()> {
        let accepted = match (presented, self.key.as_deref()) {
            (Some(presented), Some(expected)) => secrets_match(presented, expected),
            _ => false,
        };

        if accepted {
            return Ok(());
        }

        tracing::warn!(
            presented = presented.is_some(),
            configured = self.key.is_some(),
            "Service key rejected"
        );
        Err(AppError::auth(
            codes::INVALID_SERVICE_KEY,
            "Invalid service key",
        ))
    }

    /// Read the key from `x-service-key`, falling back to a bearer credential
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> AppResult<()> {
        let presented = headers
            .get(SERVICE_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .or_else(|| extract_bearer_token(headers));

        self.authenticate_admin(presented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    #[test]
    fn test_matching_key_is_accepted() {
        let gate = ServiceKeyGate::new(Some("cron-key".to_string()));
        assert!(gate.authenticate_admin(Some("cron-key")).is_ok());
    }

    #[test]
    fn test_wrong_or_missing_key_is_rejected() {
        let gate = ServiceKeyGate::new(Some("cron-key".to_string()));

        let err = gate.authenticate_admin(Some("cron-kez")).unwrap_err();
        assert_eq!(err.code(), codes::INVALID_SERVICE_KEY);
        assert_eq!(err.status_code(), 401);
        assert!(gate.authenticate_admin(None).is_err());
    }

    #[test]
    fn test_unconfigured_gate_rejects_everything() {
        let gate = ServiceKeyGate::new(Some(String::new()));
        assert!(!gate.is_configured());
        assert!(gate.authenticate_admin(Some("")).is_err());
        assert!(ServiceKeyGate::default().authenticate_admin(Some("x")).is_err());
    }

    #[test]
    fn test_headers() {
        let gate = ServiceKeyGate::new(Some("cron-key".to_string()));

        let mut headers = HeaderMap::new();
        headers.insert(SERVICE_KEY_HEADER, HeaderValue::from_static("cron-key"));
        assert!(gate.authenticate_headers(&headers).is_ok());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer cron-key"));
        assert!(gate.authenticate_headers(&headers).is_ok());

        assert!(gate.authenticate_headers(&HeaderMap::new()).is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let gate = ServiceKeyGate::new(Some("cron-key".to_string()));
        assert!(!format!("{gate:?}").contains("cron-key"));
    }
}
