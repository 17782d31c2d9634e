//! Error normalization
//!
//! Collapses arbitrary failures into the [`AppError`] taxonomy.
//!
//! Errors raised inside the workspace are already typed and pass through
//! unchanged. The message-sniffing fallback exists only for errors that
//! surface from collaborators outside our control (store clients, gateway
//! SDKs) and is best-effort: it never upgrades an unknown failure to an
//! operational one unless a hint matches.

use std::error::Error;

use super::app_error::{AppError, AppResult};
use super::kind::ErrorKind;
use super::validation::ValidationErrors;

/// Boxed dynamic error as produced by external client libraries
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Substring hints, checked in order against the lower-cased message
const MESSAGE_HINTS: &[(&[&str], ErrorKind)] = &[
    (&["unauthorized", "authentication"], ErrorKind::Auth),
    (&["forbidden", "permission"], ErrorKind::Authorization),
    (&["not found"], ErrorKind::NotFound),
    (&["conflict", "already exists"], ErrorKind::Conflict),
    (&["rate limit"], ErrorKind::RateLimit),
    (&["payment"], ErrorKind::Payment),
    (&["database"], ErrorKind::Database),
];

/// Normalize any error into an [`AppError`]
///
/// 1. An `AppError` is returned unchanged.
/// 2. [`ValidationErrors`] become a `ValidationError` on the first field.
/// 3. Anything else is classified by [`classify_message`].
pub fn normalize_error(err: BoxError) -> AppError {
    let err = match err.downcast::<AppError>() {
        Ok(app_error) => return *app_error,
        Err(other) => other,
    };

    let err = match err.downcast::<ValidationErrors>() {
        Ok(errors) => return AppError::from_violations(*errors),
        Err(other) => other,
    };

    let kind = classify_message(&err.to_string());
    let app_error = AppError::new(kind, err.to_string()).with_boxed_source(err);

    tracing::debug!(
        error_name = kind.name(),
        "Classified foreign error by message heuristics"
    );

    app_error
}

/// Best-effort classification of a foreign error message
///
/// Falls back to [`ErrorKind::InternalServer`] when no hint matches.
pub fn classify_message(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();
    MESSAGE_HINTS
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::InternalServer)
}

/// Normalize the error side of a foreign `Result`
pub trait NormalizeExt<T> {
    fn normalize_err(self) -> AppResult<T>;
}

impl<T, E> NormalizeExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn normalize_err(self) -> AppResult<T> {
        self.map_err(|e| normalize_error(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes;
    use crate::error::validation::FieldViolation;

    fn foreign(message: &str) -> BoxError {
        Box::new(std::io::Error::new(std::io::ErrorKind::Other, message.to_string()))
    }

    #[test]
    fn test_app_error_passes_through() {
        let original = AppError::auth(codes::TOKEN_EXPIRED, "Token has expired");
        let normalized = normalize_error(Box::new(original));
        assert_eq!(normalized.kind(), ErrorKind::Auth);
        assert_eq!(normalized.code(), codes::TOKEN_EXPIRED);
        assert_eq!(normalized.message(), "Token has expired");
    }

    #[test]
    fn test_validation_errors_become_validation_error() {
        let errors = ValidationErrors::single(FieldViolation::new(
            "email",
            "invalid_email",
            "Invalid email address",
        ));
        let normalized = normalize_error(Box::new(errors));
        assert_eq!(normalized.kind(), ErrorKind::Validation);
        assert_eq!(normalized.field(), Some("email"));
        assert_eq!(normalized.status_code(), 400);
    }

    #[test]
    fn test_user_not_found_becomes_not_found() {
        let normalized = normalize_error(foreign("user not found"));
        assert_eq!(normalized.kind(), ErrorKind::NotFound);
        assert_eq!(normalized.status_code(), 404);
        assert!(normalized.is_operational());
    }

    #[test]
    fn test_message_hints() {
        let cases = [
            ("Unauthorized request", ErrorKind::Auth),
            ("authentication required", ErrorKind::Auth),
            ("Forbidden", ErrorKind::Authorization),
            ("missing permission on table", ErrorKind::Authorization),
            ("duplicate: row already exists", ErrorKind::Conflict),
            ("write conflict", ErrorKind::Conflict),
            ("Rate limit reached upstream", ErrorKind::RateLimit),
            ("payment declined", ErrorKind::Payment),
            ("database is locked", ErrorKind::Database),
        ];
        for (message, expected) in cases {
            assert_eq!(classify_message(message), expected, "{message}");
        }
    }

    #[test]
    fn test_unmatched_falls_back_to_internal() {
        let normalized = normalize_error(foreign("segfault in libfoo"));
        assert_eq!(normalized.kind(), ErrorKind::InternalServer);
        assert!(!normalized.is_operational());
        assert_eq!(normalized.source_chain(), vec!["segfault in libfoo".to_string()]);
    }

    #[test]
    fn test_normalize_ext() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "profile not found",
        ));
        assert_eq!(result.normalize_err().unwrap_err().kind(), ErrorKind::NotFound);
    }
}
