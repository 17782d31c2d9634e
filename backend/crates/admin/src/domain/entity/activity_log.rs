//! Admin Activity Log Entity

use auth::Email;
use chrono::{DateTime, Utc};
use kernel::id::ActivityLogId;
use serde::Serialize;
use serde_json::Value;

use crate::domain::value_object::admin_action::AdminAction;

/// One append-only audit record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminActivityLog {
    pub id: ActivityLogId,
    pub admin_email: Email,
    pub action: AdminAction,
    pub target_type: String,
    pub target_id: Option<String>,
    pub details: Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}
