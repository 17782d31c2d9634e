//! Named schemas for the system's payloads
//!
//! Built once on first use and shared for the life of the process.

use std::sync::LazyLock;

use kernel::error::validation::FieldViolation;
use serde_json::{Map, Value};

use super::rules;
use super::schema::{FieldSpec, Rule, Schema, StringRule};

pub const PLANS: &[&str] = &["basic", "professional", "enterprise"];
pub const BILLING_CYCLES: &[&str] = &["monthly", "yearly"];
pub const CURRENCIES: &[&str] = &["INR", "USD"];
pub const USER_ROLES: &[&str] = &["user", "admin"];
pub const SUBSCRIPTION_STATUSES: &[&str] = &["active", "inactive", "cancelled", "expired", "trial"];

static SIGN_IN: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("sign_in")
        .field(FieldSpec::required("email", rules::email()))
        .field(FieldSpec::required("password", rules::password_present()))
});

static SIGN_UP: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("sign_up")
        .field(FieldSpec::required("email", rules::email()))
        .field(FieldSpec::required("password", rules::password_complex()))
        .field(FieldSpec::required("fullName", rules::display_name(100)))
        .field(FieldSpec::optional("companyName", rules::display_name(200)))
});

static PROFILE_UPDATE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("profile_update")
        .field(FieldSpec::optional("fullName", rules::display_name(100)))
        .field(FieldSpec::optional("companyName", rules::display_name(200)))
        .field(FieldSpec::optional("phone", rules::phone()))
        .field(FieldSpec::optional("notificationsEnabled", Rule::Boolean))
        .field(FieldSpec::optional(
            "categories",
            Rule::Array {
                item: Box::new(rules::safe_text(100)),
                max_items: Some(20),
            },
        ))
        .refine(require_any_field)
});

static SUBSCRIPTION_CREATE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("subscription_create")
        .field(FieldSpec::required("plan", Rule::OneOf(PLANS)))
        .field(FieldSpec::optional("billingCycle", Rule::OneOf(BILLING_CYCLES)).with_default("monthly"))
});

static SUBSCRIPTION_CANCEL: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("subscription_cancel")
        .field(FieldSpec::required("subscriptionId", rules::uuid()))
        .field(FieldSpec::optional("reason", rules::safe_text(500)))
});

static PAYMENT_ORDER_CREATE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("payment_order_create")
        .field(FieldSpec::required("amount", rules::amount()))
        .field(FieldSpec::optional("currency", Rule::OneOf(CURRENCIES)).with_default("INR"))
        .field(FieldSpec::required("plan", Rule::OneOf(PLANS)))
        .field(FieldSpec::optional("billingCycle", Rule::OneOf(BILLING_CYCLES)).with_default("monthly"))
});

static PAYMENT_ORDER_VERIFY: LazyLock<Schema> = LazyLock::new(|| {
    let id = |max| Rule::String(StringRule::new().trimmed().min(1).max(max).reject_malicious());
    Schema::new("payment_order_verify")
        .field(FieldSpec::required("orderId", id(64)))
        .field(FieldSpec::required("paymentId", id(64)))
        .field(FieldSpec::required("signature", id(256)))
});

static ADMIN_USER_UPDATE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("admin_user_update")
        .field(FieldSpec::required("userId", rules::uuid()))
        .field(FieldSpec::optional("fullName", rules::display_name(100)))
        .field(FieldSpec::optional("role", Rule::OneOf(USER_ROLES)))
        .field(FieldSpec::optional(
            "subscriptionStatus",
            Rule::OneOf(SUBSCRIPTION_STATUSES),
        ))
});

static ADMIN_STATUS_UPDATE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("admin_status_update")
        .field(FieldSpec::required("userId", rules::uuid()))
        .field(FieldSpec::required("isActive", Rule::Boolean))
        .field(FieldSpec::optional("reason", rules::safe_text(500)))
});

static TENDER_SEARCH: LazyLock<Schema> = LazyLock::new(|| {
    let value = || Rule::Number {
        min: Some(0.0),
        max: None,
        max_decimals: Some(2),
    };
    Schema::new("tender_search")
        .field(FieldSpec::optional("query", rules::search_query()))
        .field(FieldSpec::optional("category", rules::safe_text(100)))
        .field(FieldSpec::optional("location", rules::safe_text(100)))
        .field(FieldSpec::optional("minValue", value()))
        .field(FieldSpec::optional("maxValue", value()))
        .field(rules::page())
        .field(rules::limit())
        .refine(min_not_above_max)
});

pub fn sign_in() -> &'static Schema {
    &SIGN_IN
}

pub fn sign_up() -> &'static Schema {
    &SIGN_UP
}

pub fn profile_update() -> &'static Schema {
    &PROFILE_UPDATE
}

pub fn subscription_create() -> &'static Schema {
    &SUBSCRIPTION_CREATE
}

pub fn subscription_cancel() -> &'static Schema {
    &SUBSCRIPTION_CANCEL
}

pub fn payment_order_create() -> &'static Schema {
    &PAYMENT_ORDER_CREATE
}

pub fn payment_order_verify() -> &'static Schema {
    &PAYMENT_ORDER_VERIFY
}

pub fn admin_user_update() -> &'static Schema {
    &ADMIN_USER_UPDATE
}

pub fn admin_status_update() -> &'static Schema {
    &ADMIN_STATUS_UPDATE
}

pub fn tender_search() -> &'static Schema {
    &TENDER_SEARCH
}

/// Refinement: at least one declared field must be present
pub fn require_any_field(object: &Map<String, Value>) -> Option<FieldViolation> {
    object.is_empty().then(|| {
        FieldViolation::new("body", "empty_update", "At least one field must be provided")
    })
}

fn min_not_above_max(object: &Map<String, Value>) -> Option<FieldViolation> {
    let min = object.get("minValue").and_then(Value::as_f64)?;
    let max = object.get("maxValue").and_then(Value::as_f64)?;
    (min > max).then(|| {
        FieldViolation::new(
            "minValue",
            "invalid_range",
            "minValue must be less than or equal to maxValue",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sign_in_normalizes_email() {
        let out = sign_in()
            .validate(&json!({ "email": "  Alice@Example.COM ", "password": "x" }))
            .unwrap();
        assert_eq!(out["email"], "alice@example.com");
    }

    #[test]
    fn test_sign_up_password_complexity() {
        let base = |password: &str| {
            json!({ "email": "a@b.co", "password": password, "fullName": "Asha Rao" })
        };

        assert!(sign_up().validate(&base("Str0ng!Pass")).is_ok());

        let cases = [
            ("short1!", "too_short"),
            ("alllower1!", "missing_uppercase"),
            ("ALLUPPER1!", "missing_lowercase"),
            ("NoDigits!!", "missing_digit"),
            ("NoSpecial12", "missing_special"),
        ];
        for (password, code) in cases {
            let errors = sign_up().validate(&base(password)).unwrap_err();
            assert_eq!(errors.first().field, "password");
            assert_eq!(errors.first().code, code, "password {password}");
        }
    }

    #[test]
    fn test_tender_search_rejects_injection() {
        let errors = tender_search()
            .validate(&json!({ "query": "'; DROP TABLE users;--" }))
            .unwrap_err();
        assert_eq!(errors.first().field, "query");
        assert_eq!(errors.first().code, "malicious_content");
    }

    #[test]
    fn test_tender_search_range_and_paging() {
        let out = tender_search()
            .validate(&json!({ "query": "roads", "minValue": 10, "maxValue": 20 }))
            .unwrap();
        assert_eq!(out["page"], 1);
        assert_eq!(out["limit"], 20);

        let errors = tender_search()
            .validate(&json!({ "minValue": 30, "maxValue": 20 }))
            .unwrap_err();
        assert_eq!(errors.first().field, "minValue");

        let errors = tender_search().validate(&json!({ "limit": 500 })).unwrap_err();
        assert_eq!(errors.first().code, "too_big");
    }

    #[test]
    fn test_payment_amount_precision() {
        let ok = payment_order_create()
            .validate(&json!({ "amount": 999.99, "plan": "basic" }))
            .unwrap();
        assert_eq!(ok["currency"], "INR");
        assert_eq!(ok["billingCycle"], "monthly");

        let errors = payment_order_create()
            .validate(&json!({ "amount": 10.005, "plan": "basic" }))
            .unwrap_err();
        assert_eq!(errors.first().code, "too_many_decimals");
    }

    #[test]
    fn test_subscription_cancel_requires_uuid() {
        let errors = subscription_cancel()
            .validate(&json!({ "subscriptionId": "not-a-uuid" }))
            .unwrap_err();
        assert_eq!(errors.first().code, "invalid_format");

        assert!(
            subscription_cancel()
                .validate(&json!({ "subscriptionId": "6f1c2a4e-8b1d-4c3e-9f00-1234567890ab" }))
                .is_ok()
        );
    }

    #[test]
    fn test_profile_update_needs_a_field() {
        let errors = profile_update().validate(&json!({})).unwrap_err();
        assert_eq!(errors.first().code, "empty_update");
        assert!(profile_update().validate(&json!({ "phone": "+91 98765 43210" })).is_ok());
    }

    #[test]
    fn test_admin_status_update() {
        let errors = admin_status_update()
            .validate(&json!({ "userId": "6f1c2a4e-8b1d-4c3e-9f00-1234567890ab" }))
            .unwrap_err();
        assert_eq!(errors.first().field, "isActive");
        assert_eq!(errors.first().code, "required");
    }
}
