//! Primitive field rules shared by the named schemas

use std::sync::LazyLock;

use regex::Regex;

use super::schema::{FieldSpec, Rule, StringRule};

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("field rule patterns are valid")
}

static EMAIL: LazyLock<Regex> = LazyLock::new(|| regex(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));
static UUID: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
});
static PHONE: LazyLock<Regex> = LazyLock::new(|| regex(r"^\+?[0-9][0-9 ()-]{6,19}$"));

pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Trimmed, lower-cased email address
pub fn email() -> Rule {
    Rule::String(
        StringRule::new()
            .trimmed()
            .lowercased()
            .min(1)
            .max(255)
            .pattern(EMAIL.clone(), "Invalid email address"),
    )
}

/// Password accepted at sign-in: anything non-empty
pub fn password_present() -> Rule {
    Rule::String(StringRule::new().min(1).max(128))
}

/// Password accepted at sign-up: 8 to 128 characters with upper and
/// lower case, a digit and a special character
pub fn password_complex() -> Rule {
    Rule::String(
        StringRule::new()
            .min(8)
            .max(128)
            .check(
                |s| s.chars().any(|c| c.is_uppercase()),
                "missing_uppercase",
                "Password must contain an uppercase letter",
            )
            .check(
                |s| s.chars().any(|c| c.is_lowercase()),
                "missing_lowercase",
                "Password must contain a lowercase letter",
            )
            .check(
                |s| s.chars().any(|c| c.is_ascii_digit()),
                "missing_digit",
                "Password must contain a number",
            )
            .check(
                |s| s.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
                "missing_special",
                "Password must contain a special character",
            ),
    )
}

pub fn uuid() -> Rule {
    Rule::String(
        StringRule::new()
            .trimmed()
            .pattern(UUID.clone(), "Must be a valid UUID"),
    )
}

/// Person or company name
pub fn display_name(max: usize) -> Rule {
    Rule::String(StringRule::new().trimmed().min(2).max(max))
}

pub fn phone() -> Rule {
    Rule::String(
        StringRule::new()
            .trimmed()
            .pattern(PHONE.clone(), "Invalid phone number"),
    )
}

/// Free text that is refused, not rewritten, when it looks malicious
pub fn safe_text(max: usize) -> Rule {
    Rule::String(StringRule::new().trimmed().max(max).reject_malicious())
}

pub fn search_query() -> Rule {
    Rule::String(
        StringRule::new()
            .trimmed()
            .min(1)
            .max(200)
            .reject_malicious(),
    )
}

/// Money amount with at most two decimal places
pub fn amount() -> Rule {
    Rule::Number {
        min: Some(1.0),
        max: Some(10_000_000.0),
        max_decimals: Some(2),
    }
}

/// 1-based page number, defaults to 1
pub fn page() -> FieldSpec {
    FieldSpec::optional(
        "page",
        Rule::Integer {
            min: Some(1),
            max: Some(10_000),
        },
    )
    .with_default(1)
}

/// Page size, defaults to [`DEFAULT_PAGE_SIZE`]
pub fn limit() -> FieldSpec {
    FieldSpec::optional(
        "limit",
        Rule::Integer {
            min: Some(1),
            max: Some(MAX_PAGE_SIZE),
        },
    )
    .with_default(DEFAULT_PAGE_SIZE)
}
