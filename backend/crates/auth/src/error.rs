//! Auth Error Types
//!
//! Token failures are classified here and converted into the kernel
//! taxonomy at the crate boundary. Client messages are fixed strings; the
//! underlying reason travels only in the error's source chain.

use kernel::error::{app_error::AppError, codes};
use thiserror::Error;

/// Why a token was not accepted
#[derive(Debug, Error)]
pub enum TokenError {
    /// `exp` is at or before now
    #[error("token has expired")]
    Expired,

    /// Bad signature or malformed structure
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Anything else (issuer, audience, missing claims)
    #[error("token verification failed: {0}")]
    VerificationFailed(String),

    #[error("token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::Expired => codes::TOKEN_EXPIRED,
            TokenError::Invalid(_) => codes::INVALID_TOKEN,
            TokenError::VerificationFailed(_) => codes::VERIFICATION_FAILED,
            TokenError::Signing(_) => "TOKEN_SIGNING_FAILED",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidToken
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::MissingAlgorithm
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Invalid(err.to_string()),
            _ => TokenError::VerificationFailed(err.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        let message = match &err {
            TokenError::Expired => "Token has expired",
            TokenError::Invalid(_) => "Invalid token",
            TokenError::VerificationFailed(_) => "Token verification failed",
            TokenError::Signing(_) => {
                return AppError::internal("Failed to issue token").with_source(err);
            }
        };
        AppError::auth(err.code(), message).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_token_errors_map_to_auth_codes() {
        let cases = [
            (TokenError::Expired, codes::TOKEN_EXPIRED),
            (TokenError::Invalid("sig".into()), codes::INVALID_TOKEN),
            (
                TokenError::VerificationFailed("aud".into()),
                codes::VERIFICATION_FAILED,
            ),
        ];
        for (err, code) in cases {
            let app: AppError = err.into();
            assert_eq!(app.kind(), ErrorKind::Auth);
            assert_eq!(app.code(), code);
            assert_eq!(app.status_code(), 401);
        }
    }

    #[test]
    fn test_reason_not_in_client_message() {
        let app: AppError = TokenError::Invalid("InvalidSignature at byte 12".into()).into();
        assert_eq!(app.message(), "Invalid token");
        assert!(app.source_chain().iter().any(|s| s.contains("InvalidSignature")));
    }
}
