//! API DTOs (Data Transfer Objects)

use std::sync::LazyLock;

use platform::validation::schemas::require_any_field;
use platform::validation::{BodySchema, FieldSpec, Rule, Schema, rules};
use serde::Deserialize;

use crate::domain::value_object::{
    admin_role_kind::AdminRoleKind,
    permission::{Permission, PermissionSet},
};

fn permissions_rule() -> Rule {
    Rule::Array {
        item: Box::new(Rule::OneOf(&Permission::NAMES)),
        max_items: Some(Permission::NAMES.len()),
    }
}

static ADMIN_ROLE_CREATE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("admin_role_create")
        .field(FieldSpec::required("email", rules::email()))
        .field(FieldSpec::required("role", Rule::OneOf(&AdminRoleKind::NAMES)))
        .field(FieldSpec::optional("permissions", permissions_rule()))
});

static ADMIN_ROLE_UPDATE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("admin_role_update")
        .field(FieldSpec::optional("role", Rule::OneOf(&AdminRoleKind::NAMES)))
        .field(FieldSpec::optional("permissions", permissions_rule()))
        .field(FieldSpec::optional("isActive", Rule::Boolean))
        .refine(require_any_field)
});

/// POST /api/admin/roles
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdminRoleRequest {
    pub email: String,
    pub role: AdminRoleKind,
    pub permissions: Option<PermissionSet>,
}

impl BodySchema for CreateAdminRoleRequest {
    fn schema() -> &'static Schema {
        &ADMIN_ROLE_CREATE
    }
}

/// PATCH /api/admin/roles/{id}
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminRoleRequest {
    pub role: Option<AdminRoleKind>,
    pub permissions: Option<PermissionSet>,
    pub is_active: Option<bool>,
}

impl BodySchema for UpdateAdminRoleRequest {
    fn schema() -> &'static Schema {
        &ADMIN_ROLE_UPDATE
    }
}

/// GET /api/admin/activity
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<usize>,
}
