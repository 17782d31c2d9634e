//! Input validation and sanitization
//!
//! The single point where untrusted payloads are declared well-formed.
//! Structure is checked first ([`Schema`]); only a structurally valid
//! value is then sanitized string by string ([`sanitize_value`]). Fields
//! flagged with [`StringRule::reject_malicious`] refuse suspicious input
//! outright instead of having it rewritten.

pub mod extract;
pub mod file;
pub mod patterns;
pub mod rules;
pub mod sanitize;
pub mod schema;
pub mod schemas;

pub use extract::{BodySchema, JsonBody, Validated};
pub use file::{FileUploadPolicy, UploadedFile};
pub use patterns::contains_malicious_patterns;
pub use sanitize::{sanitize_string, sanitize_value};
pub use schema::{FieldSpec, Rule, Schema, StringRule};

use kernel::error::app_error::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Validate `data` against `schema`, then sanitize every string leaf
///
/// On failure the error names the first violated field and carries every
/// violation in `details`.
pub fn validate_and_sanitize(data: &Value, schema: &Schema) -> AppResult<Value> {
    let cleaned = schema.validate(data).map_err(|errors| {
        tracing::debug!(
            schema = schema.name(),
            violations = errors.len(),
            first_field = %errors.first().field,
            "Payload failed validation"
        );
        AppError::from_violations(errors)
    })?;

    Ok(sanitize_value(cleaned))
}

/// [`validate_and_sanitize`] into a typed payload
pub fn validate_as<T: DeserializeOwned>(data: &Value, schema: &Schema) -> AppResult<T> {
    let cleaned = validate_and_sanitize(data, schema)?;
    Ok(serde_json::from_value(cleaned)?)
}
