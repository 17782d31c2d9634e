//! Audited admin actions

use std::str::FromStr;

use derive_more::Display;
use kernel::error::app_error::AppError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum AdminAction {
    #[serde(rename = "admin_role_created")]
    #[display("admin_role_created")]
    RoleCreated,
    #[serde(rename = "admin_role_updated")]
    #[display("admin_role_updated")]
    RoleUpdated,
    #[serde(rename = "admin_role_deleted")]
    #[display("admin_role_deleted")]
    RoleDeleted,
}

impl FromStr for AdminAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin_role_created" => Ok(Self::RoleCreated),
            "admin_role_updated" => Ok(Self::RoleUpdated),
            "admin_role_deleted" => Ok(Self::RoleDeleted),
            other => Err(AppError::internal(format!("Invalid admin action: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_and_stored_names_agree() {
        let action = AdminAction::RoleUpdated;
        assert_eq!(
            serde_json::to_value(action).unwrap(),
            serde_json::Value::String(action.to_string())
        );
        assert_eq!("admin_role_deleted".parse::<AdminAction>().unwrap(), AdminAction::RoleDeleted);
    }
}
