//! Declarative payload schemas
//!
//! A [`Schema`] is a named list of [`FieldSpec`]s plus object-level
//! refinements. Validation collects every violation rather than stopping
//! at the first, and returns a cleaned object holding only declared
//! fields.

use std::fmt;

use kernel::error::validation::{FieldViolation, ValidationErrors};
use regex::Regex;
use serde_json::{Map, Number, Value};

use super::patterns::contains_malicious_patterns;

/// Cross-field check over an object whose fields already passed
pub type Refinement = fn(&Map<String, Value>) -> Option<FieldViolation>;

/// Extra predicate on a string value
#[derive(Clone, Copy)]
pub struct StringCheck {
    pub test: fn(&str) -> bool,
    pub code: &'static str,
    pub message: &'static str,
}

#[derive(Clone, Default)]
pub struct StringRule {
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub pattern: Option<(Regex, &'static str)>,
    pub checks: Vec<StringCheck>,
    pub trim: bool,
    pub lowercase: bool,
    pub reject_malicious: bool,
}

impl StringRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    pub fn max(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    pub fn pattern(mut self, regex: Regex, message: &'static str) -> Self {
        self.pattern = Some((regex, message));
        self
    }

    pub fn check(mut self, test: fn(&str) -> bool, code: &'static str, message: &'static str) -> Self {
        self.checks.push(StringCheck {
            test,
            code,
            message,
        });
        self
    }

    pub fn trimmed(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn lowercased(mut self) -> Self {
        self.lowercase = true;
        self
    }

    /// Refuse the whole value when it looks like an injection attempt
    pub fn reject_malicious(mut self) -> Self {
        self.reject_malicious = true;
        self
    }
}

/// Constraint on a single value
#[derive(Clone)]
pub enum Rule {
    String(StringRule),
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
        max_decimals: Option<u32>,
    },
    Boolean,
    OneOf(&'static [&'static str]),
    Array {
        item: Box<Rule>,
        max_items: Option<usize>,
    },
    Object(Box<Schema>),
}

#[derive(Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: Rule,
    pub required: bool,
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn required(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            required: true,
            default: None,
        }
    }

    pub fn optional(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            required: false,
            default: None,
        }
    }

    /// Value used when the field is absent
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

#[derive(Clone)]
pub struct Schema {
    name: &'static str,
    fields: Vec<FieldSpec>,
    refinements: Vec<Refinement>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field(
                "fields",
                &self.fields.iter().map(|f| f.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Schema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            refinements: Vec::new(),
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn refine(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Validate `input`, returning the cleaned object
    pub fn validate(&self, input: &Value) -> Result<Value, ValidationErrors> {
        let mut violations = Vec::new();
        let cleaned = self.validate_object("", input, &mut violations);

        match ValidationErrors::from_vec(violations) {
            Some(errors) => Err(errors),
            None => Ok(cleaned.map(Value::Object).unwrap_or(Value::Null)),
        }
    }

    fn validate_object(
        &self,
        prefix: &str,
        input: &Value,
        violations: &mut Vec<FieldViolation>,
    ) -> Option<Map<String, Value>> {
        let Some(object) = input.as_object() else {
            let field = if prefix.is_empty() { "body" } else { prefix };
            violations.push(FieldViolation::new(
                field,
                "invalid_type",
                "Expected an object",
            ));
            return None;
        };

        let before = violations.len();
        let mut cleaned = Map::new();

        for spec in &self.fields {
            let path = join_path(prefix, spec.name);
            match object.get(spec.name).filter(|v| !v.is_null()) {
                Some(value) => {
                    if let Some(value) = check_rule(&spec.rule, &path, value, violations) {
                        cleaned.insert(spec.name.to_string(), value);
                    }
                }
                None => {
                    if let Some(default) = &spec.default {
                        cleaned.insert(spec.name.to_string(), default.clone());
                    } else if spec.required {
                        violations.push(FieldViolation::new(
                            path,
                            "required",
                            format!("{} is required", spec.name),
                        ));
                    }
                }
            }
        }

        if violations.len() == before {
            for refinement in &self.refinements {
                if let Some(mut violation) = refinement(&cleaned) {
                    violation.field = join_path(prefix, &violation.field);
                    violations.push(violation);
                }
            }
        }

        Some(cleaned)
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_rule(
    rule: &Rule,
    path: &str,
    value: &Value,
    violations: &mut Vec<FieldViolation>,
) -> Option<Value> {
    match rule {
        Rule::String(rule) => check_string(rule, path, value, violations),
        Rule::Integer { min, max } => {
            let Some(n) = value.as_i64() else {
                violations.push(FieldViolation::new(path, "invalid_type", "Expected an integer"));
                return None;
            };
            if let Some(min) = min.filter(|min| n < *min) {
                violations.push(FieldViolation::new(
                    path,
                    "too_small",
                    format!("Must be at least {min}"),
                ));
                return None;
            }
            if let Some(max) = max.filter(|max| n > *max) {
                violations.push(FieldViolation::new(
                    path,
                    "too_big",
                    format!("Must be at most {max}"),
                ));
                return None;
            }
            Some(Value::from(n))
        }
        Rule::Number {
            min,
            max,
            max_decimals,
        } => {
            let Some(n) = value.as_f64().filter(|n| n.is_finite()) else {
                violations.push(FieldViolation::new(path, "invalid_type", "Expected a number"));
                return None;
            };
            if let Some(min) = min.filter(|min| n < *min) {
                violations.push(FieldViolation::new(
                    path,
                    "too_small",
                    format!("Must be at least {min}"),
                ));
                return None;
            }
            if let Some(max) = max.filter(|max| n > *max) {
                violations.push(FieldViolation::new(
                    path,
                    "too_big",
                    format!("Must be at most {max}"),
                ));
                return None;
            }
            if let Some(decimals) = max_decimals.filter(|d| !has_at_most_decimals(n, *d)) {
                violations.push(FieldViolation::new(
                    path,
                    "too_many_decimals",
                    format!("Must have at most {decimals} decimal places"),
                ));
                return None;
            }
            Number::from_f64(n).map(Value::Number)
        }
        Rule::Boolean => match value {
            Value::Bool(b) => Some(Value::Bool(*b)),
            _ => {
                violations.push(FieldViolation::new(path, "invalid_type", "Expected a boolean"));
                None
            }
        },
        Rule::OneOf(options) => match value.as_str() {
            Some(s) if options.contains(&s) => Some(Value::from(s)),
            _ => {
                violations.push(FieldViolation::new(
                    path,
                    "invalid_enum",
                    format!("Must be one of: {}", options.join(", ")),
                ));
                None
            }
        },
        Rule::Array { item, max_items } => {
            let Some(items) = value.as_array() else {
                violations.push(FieldViolation::new(path, "invalid_type", "Expected an array"));
                return None;
            };
            if let Some(max) = max_items.filter(|max| items.len() > *max) {
                violations.push(FieldViolation::new(
                    path,
                    "too_many_items",
                    format!("Must contain at most {max} items"),
                ));
                return None;
            }
            let cleaned: Vec<Value> = items
                .iter()
                .enumerate()
                .filter_map(|(i, v)| check_rule(item, &format!("{path}.{i}"), v, violations))
                .collect();
            (cleaned.len() == items.len()).then_some(Value::Array(cleaned))
        }
        Rule::Object(schema) => schema
            .validate_object(path, value, violations)
            .map(Value::Object),
    }
}

fn check_string(
    rule: &StringRule,
    path: &str,
    value: &Value,
    violations: &mut Vec<FieldViolation>,
) -> Option<Value> {
    let Some(raw) = value.as_str() else {
        violations.push(FieldViolation::new(path, "invalid_type", "Expected a string"));
        return None;
    };

    let mut s = if rule.trim { raw.trim() } else { raw }.to_string();
    if rule.lowercase {
        s = s.to_lowercase();
    }

    let len = s.chars().count();
    if let Some(min) = rule.min_len.filter(|min| len < *min) {
        let message = if min == 1 {
            "Must not be empty".to_string()
        } else {
            format!("Must be at least {min} characters")
        };
        violations.push(FieldViolation::new(path, "too_short", message));
        return None;
    }
    if let Some(max) = rule.max_len.filter(|max| len > *max) {
        violations.push(FieldViolation::new(
            path,
            "too_long",
            format!("Must be at most {max} characters"),
        ));
        return None;
    }

    if let Some((regex, message)) = &rule.pattern {
        if !regex.is_match(&s) {
            violations.push(FieldViolation::new(path, "invalid_format", *message));
            return None;
        }
    }

    if let Some(check) = rule.checks.iter().find(|check| !(check.test)(&s)) {
        violations.push(FieldViolation::new(path, check.code, check.message));
        return None;
    }

    if rule.reject_malicious && contains_malicious_patterns(&s) {
        violations.push(FieldViolation::new(
            path,
            "malicious_content",
            "Contains disallowed characters or patterns",
        ));
        return None;
    }

    Some(Value::String(s))
}

fn has_at_most_decimals(n: f64, decimals: u32) -> bool {
    let scaled = n * 10f64.powi(decimals as i32);
    (scaled - scaled.round()).abs() < 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn range_schema() -> Schema {
        Schema::new("range")
            .field(FieldSpec::required(
                "name",
                Rule::String(StringRule::new().trimmed().min(1).max(5)),
            ))
            .field(FieldSpec::optional(
                "low",
                Rule::Integer {
                    min: Some(0),
                    max: None,
                },
            ))
            .field(FieldSpec::optional(
                "high",
                Rule::Integer {
                    min: Some(0),
                    max: None,
                },
            ))
            .field(FieldSpec::optional("mode", Rule::OneOf(&["a", "b"])).with_default("a"))
            .refine(|obj| match (obj.get("low"), obj.get("high")) {
                (Some(low), Some(high)) if low.as_i64() > high.as_i64() => Some(
                    FieldViolation::new("low", "invalid_range", "low must not exceed high"),
                ),
                _ => None,
            })
    }

    #[test]
    fn test_cleans_and_applies_defaults() {
        let out = range_schema()
            .validate(&json!({ "name": "  abc ", "low": 1, "extra": "dropped" }))
            .unwrap();
        assert_eq!(out, json!({ "name": "abc", "low": 1, "mode": "a" }));
    }

    #[test]
    fn test_collects_all_violations_in_order() {
        let errors = range_schema()
            .validate(&json!({ "name": "toolongname", "low": -1, "mode": "z" }))
            .unwrap_err();

        let fields: Vec<&str> = errors.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "low", "mode"]);
        assert_eq!(errors.first().code, "too_long");
    }

    #[test]
    fn test_missing_required_and_null_optional() {
        let errors = range_schema()
            .validate(&json!({ "low": null }))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().field, "name");
        assert_eq!(errors.first().code, "required");
    }

    #[test]
    fn test_refinement_runs_after_fields_pass() {
        let errors = range_schema()
            .validate(&json!({ "name": "x", "low": 9, "high": 3 }))
            .unwrap_err();
        assert_eq!(errors.first().field, "low");
        assert_eq!(errors.first().code, "invalid_range");
    }

    #[test]
    fn test_non_object_body() {
        let errors = range_schema().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(errors.first().field, "body");
    }

    #[test]
    fn test_nested_object_and_array_paths() {
        let schema = Schema::new("nested").field(FieldSpec::required(
            "filters",
            Rule::Object(Box::new(Schema::new("filters").field(FieldSpec::required(
                "tags",
                Rule::Array {
                    item: Box::new(Rule::String(StringRule::new().max(3))),
                    max_items: Some(3),
                },
            )))),
        ));

        let errors = schema
            .validate(&json!({ "filters": { "tags": ["ok", "too long"] } }))
            .unwrap_err();
        assert_eq!(errors.first().field, "filters.tags.1");
    }

    #[test]
    fn test_decimal_precision() {
        assert!(has_at_most_decimals(19.99, 2));
        assert!(has_at_most_decimals(100.0, 2));
        assert!(!has_at_most_decimals(10.005, 2));
    }

    #[test]
    fn test_malicious_rejection_flag() {
        let schema = Schema::new("q").field(FieldSpec::required(
            "q",
            Rule::String(StringRule::new().reject_malicious()),
        ));
        assert!(schema.validate(&json!({ "q": "road works" })).is_ok());

        let errors = schema
            .validate(&json!({ "q": "x' OR 1=1" }))
            .unwrap_err();
        assert_eq!(errors.first().code, "malicious_content");
    }
}
