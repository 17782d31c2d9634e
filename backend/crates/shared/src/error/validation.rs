//! Validation vocabulary
//!
//! Schema checks anywhere in the workspace report failures as
//! [`ValidationErrors`]; the normalizer turns them into a
//! `ValidationError` naming the first violated field.

use std::fmt;

use serde::Serialize;

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path to the offending value (`filters.minValue`, `items.2`)
    pub field: String,
    /// Machine-readable constraint name (`too_short`, `invalid_email`, ...)
    pub code: String,
    /// Human-readable message, safe to show to the client
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Non-empty list of violations, in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Returns `None` for an empty list so callers can write
    /// `if let Some(errors) = ValidationErrors::from_vec(found)`.
    pub fn from_vec(violations: Vec<FieldViolation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    pub fn single(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// The violation reported as the error's headline
    pub fn first(&self) -> &FieldViolation {
        &self.violations[0]
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// JSON array of all violations, used as the envelope's `details`
    pub fn to_details(&self) -> serde_json::Value {
        serde_json::json!({ "errors": self.violations })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.first();
        write!(f, "{}: {}", first.field, first.message)
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_is_not_an_error() {
        assert!(ValidationErrors::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn test_first_violation_is_headline() {
        let errors = ValidationErrors::from_vec(vec![
            FieldViolation::new("email", "invalid_email", "Invalid email address"),
            FieldViolation::new("password", "too_short", "Password is too short"),
        ])
        .unwrap();

        assert_eq!(errors.first().field, "email");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.to_string(), "email: Invalid email address");
        assert_eq!(errors.to_details()["errors"][1]["field"], "password");
    }
}
