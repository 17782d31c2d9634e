//! Error Kind - Classification of errors
//!
//! Defines the closed [`ErrorKind`] taxonomy and its HTTP status mapping.

use serde::Serialize;

/// Error taxonomy tag
///
/// Every failure that reaches a client is classified into exactly one of
/// these kinds. The set is closed: new failure modes pick an existing kind
/// and a more specific `code` on [`AppError`](super::app_error::AppError).
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::NotFound;
/// assert_eq!(kind.status_code(), 404);
/// assert_eq!(kind.default_code(), "NOT_FOUND");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// 401 - the caller could not be authenticated
    Auth,
    /// 403 - the caller is authenticated but not allowed
    Authorization,
    /// 400 - the payload is malformed or violates a schema
    Validation,
    /// 404 - the resource does not exist
    NotFound,
    /// 409 - the request conflicts with current state
    Conflict,
    /// 429 - the caller exceeded its request budget
    RateLimit,
    /// 402 - the payment gateway refused or failed the payment
    Payment,
    /// 502 - a downstream collaborator failed
    ExternalService,
    /// 500 - the data layer failed (operational)
    Database,
    /// 500 - anything unexpected (non-operational)
    InternalServer,
}

impl ErrorKind {
    /// Every kind, in declaration order
    pub const ALL: [ErrorKind; 10] = [
        ErrorKind::Auth,
        ErrorKind::Authorization,
        ErrorKind::Validation,
        ErrorKind::NotFound,
        ErrorKind::Conflict,
        ErrorKind::RateLimit,
        ErrorKind::Payment,
        ErrorKind::ExternalService,
        ErrorKind::Database,
        ErrorKind::InternalServer,
    ];

    /// HTTP status code for this kind
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Validation.status_code(), 400);
    /// assert_eq!(ErrorKind::RateLimit.status_code(), 429);
    /// ```
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Auth => 401,
            ErrorKind::Authorization => 403,
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::RateLimit => 429,
            ErrorKind::Payment => 402,
            ErrorKind::ExternalService => 502,
            ErrorKind::Database => 500,
            ErrorKind::InternalServer => 500,
        }
    }

    /// Type name used in structured logs
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "AuthError",
            ErrorKind::Authorization => "AuthorizationError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::Conflict => "ConflictError",
            ErrorKind::RateLimit => "RateLimitError",
            ErrorKind::Payment => "PaymentError",
            ErrorKind::ExternalService => "ExternalServiceError",
            ErrorKind::Database => "DatabaseError",
            ErrorKind::InternalServer => "InternalServerError",
        }
    }

    /// Machine-readable code used when no more specific code is given
    #[inline]
    pub const fn default_code(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "AUTH_ERROR",
            ErrorKind::Authorization => "AUTHORIZATION_ERROR",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::RateLimit => "RATE_LIMIT_EXCEEDED",
            ErrorKind::Payment => "PAYMENT_ERROR",
            ErrorKind::ExternalService => "EXTERNAL_SERVICE_ERROR",
            ErrorKind::Database => "DATABASE_ERROR",
            ErrorKind::InternalServer => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Whether errors of this kind are expected failures by default
    ///
    /// Only [`ErrorKind::InternalServer`] is non-operational; its message
    /// is masked in production.
    #[inline]
    pub const fn is_operational(&self) -> bool {
        !matches!(self, ErrorKind::InternalServer)
    }

    /// サーバー側のエラーかどうかを判定
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
