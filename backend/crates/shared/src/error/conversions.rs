//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`].

use super::app_error::AppError;
use super::kind::ErrorKind;
use super::normalize::{BoxError, normalize_error};

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::Authorization,
            _ => ErrorKind::InternalServer,
        };
        AppError::new(kind, "I/O operation failed").with_source(err)
    }
}

impl From<std::string::FromUtf8Error> for AppError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        AppError::validation("body", "Invalid UTF-8 string").with_source(err)
    }
}

/// Foreign errors go through the normalizer
impl From<BoxError> for AppError {
    fn from(err: BoxError) -> Self {
        normalize_error(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::validation("body", format!("Invalid request body: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found").with_source(err),
            sqlx::Error::PoolTimedOut => {
                AppError::database("Database connection pool exhausted").with_source(err)
            }
            sqlx::Error::Database(db_err) => {
                // PostgreSQL specific error codes
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let app_err = match db_err.code().as_deref() {
                    // Class 23 — Integrity Constraint Violation
                    Some("23505") => AppError::conflict("Record already exists"),
                    Some("23503") => AppError::conflict("Referenced record does not exist"),
                    Some("23000") | Some("23001") => {
                        AppError::conflict("Integrity constraint violation")
                    }
                    Some("23502") | Some("23514") => {
                        AppError::database("Record violates a column constraint")
                    }
                    // Class 42 — Syntax Error or Access Rule Violation
                    Some("42501") => AppError::authorization("Insufficient database privilege"),
                    _ => AppError::database("Database error"),
                };
                app_err.with_source(err)
            }
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                AppError::database("Database connection error").with_source(err)
            }
            _ => AppError::database("Database error").with_source(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), ErrorKind::NotFound);

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::Validation);
        assert_eq!(app_err.field(), Some("body"));
    }

    #[test]
    fn test_boxed_error_is_normalized() {
        let boxed: BoxError = "upstream payment declined".into();
        let app_err: AppError = boxed.into();
        assert_eq!(app_err.kind(), ErrorKind::Payment);
    }
}
