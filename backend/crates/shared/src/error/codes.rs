//! Error codes
//!
//! Stable machine-readable codes carried in the error envelope's `code`
//! field. Kind defaults live on [`ErrorKind`](super::kind::ErrorKind).

// Authentication
pub const MISSING_TOKEN: &str = "MISSING_TOKEN";
pub const INVALID_TOKEN: &str = "INVALID_TOKEN";
pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
pub const VERIFICATION_FAILED: &str = "VERIFICATION_FAILED";
pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
pub const SUBSCRIPTION_REQUIRED: &str = "SUBSCRIPTION_REQUIRED";
pub const SUBSCRIPTION_EXPIRED: &str = "SUBSCRIPTION_EXPIRED";
pub const INVALID_SERVICE_KEY: &str = "INVALID_SERVICE_KEY";

// Authorization
pub const INSUFFICIENT_PERMISSIONS: &str = "INSUFFICIENT_PERMISSIONS";
pub const ADMIN_REQUIRED: &str = "ADMIN_REQUIRED";

// Validation
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const FILE_TOO_LARGE: &str = "FILE_TOO_LARGE";
pub const INVALID_FILE_TYPE: &str = "INVALID_FILE_TYPE";
pub const INVALID_FILE_EXTENSION: &str = "INVALID_FILE_EXTENSION";
pub const MALICIOUS_FILENAME: &str = "MALICIOUS_FILENAME";

// Conflict
pub const ADMIN_EXISTS: &str = "ADMIN_EXISTS";
pub const EMAIL_TAKEN: &str = "EMAIL_TAKEN";
pub const SELF_MODIFICATION: &str = "SELF_MODIFICATION";

// Rate limiting
pub const RATE_LIMIT_EXCEEDED: &str = "RATE_LIMIT_EXCEEDED";
