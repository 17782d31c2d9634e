//! Client exposure policy
//!
//! Decides which parts of an [`AppError`] may leave the process.

use serde_json::{Map, Value};

use super::app_error::AppError;
use super::kind::ErrorKind;
use crate::env::Environment;

/// Message shown in production for non-operational errors
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Key fragments that are never exposed, matched case-insensitively
const SENSITIVE_KEY_FRAGMENTS: &[&str] = &["password", "token", "secret", "key"];

/// Message safe to show the client
///
/// Operational errors always carry their real message. Non-operational
/// ones are masked in production.
pub fn safe_error_message(err: &AppError, environment: Environment) -> String {
    if err.is_operational() || !environment.is_production() {
        err.message().to_string()
    } else {
        GENERIC_ERROR_MESSAGE.to_string()
    }
}

/// Details safe to show the client
///
/// Only `ValidationError` details and the context of operational errors
/// are eligible, and sensitive keys are stripped from both.
pub fn safe_error_details(err: &AppError) -> Option<Value> {
    if err.kind() == ErrorKind::Validation {
        if let Some(details) = err.details() {
            return Some(strip_sensitive(details));
        }
    }

    if !err.is_operational() {
        return None;
    }

    err.context()
        .filter(|context| !context.is_empty())
        .map(|context| strip_sensitive(&Value::Object(context.clone())))
}

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    SENSITIVE_KEY_FRAGMENTS
        .iter()
        .any(|fragment| lower.contains(fragment))
}

/// Recursively drop object entries whose key looks sensitive
fn strip_sensitive(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map
                .iter()
                .filter(|(key, _)| !is_sensitive_key(key))
                .map(|(key, value)| (key.clone(), strip_sensitive(value)))
                .collect();
            Value::Object(cleaned)
        }
        Value::Array(items) => Value::Array(items.iter().map(strip_sensitive).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_internal_message_masked_only_in_production() {
        let err = AppError::internal("connection string postgres://u:p@db leaked");
        assert_eq!(
            safe_error_message(&err, Environment::Production),
            GENERIC_ERROR_MESSAGE
        );
        assert_eq!(
            safe_error_message(&err, Environment::Development),
            "connection string postgres://u:p@db leaked"
        );
    }

    #[test]
    fn test_operational_message_always_shown() {
        let err = AppError::validation("email", "Invalid email address");
        assert_eq!(
            safe_error_message(&err, Environment::Production),
            "Invalid email address"
        );
    }

    #[test]
    fn test_validation_details_are_stripped() {
        let err = AppError::validation("password", "Too short").with_details(json!({
            "errors": [{ "field": "password", "message": "Too short" }],
            "password": "hunter2",
            "apiKey": "abc",
        }));

        let details = safe_error_details(&err).unwrap();
        assert!(details.get("password").is_none());
        assert!(details.get("apiKey").is_none());
        assert_eq!(details["errors"][0]["field"], "password");
    }

    #[test]
    fn test_non_operational_context_hidden() {
        let err = AppError::internal("boom").with_context("query", "SELECT 1");
        assert!(safe_error_details(&err).is_none());
    }

    #[test]
    fn test_operational_context_exposed_without_secrets() {
        let err = AppError::external_service("payments", "Gateway unavailable")
            .with_context("accessToken", "tok_123")
            .with_context("nested", json!({ "clientSecret": "s", "attempt": 2 }));

        let details = safe_error_details(&err).unwrap();
        assert_eq!(details["service"], "payments");
        assert!(details.get("accessToken").is_none());
        assert!(details["nested"].get("clientSecret").is_none());
        assert_eq!(details["nested"]["attempt"], 2);
    }

    #[test]
    fn test_no_details_when_nothing_attached() {
        assert!(safe_error_details(&AppError::not_found("missing")).is_none());
    }
}
