//! Subscription snapshot attached to a profile

use chrono::{DateTime, Utc};
use derive_more::Display;
use kernel::error::app_error::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[display("active")]
    Active,
    #[display("trial")]
    Trial,
    #[display("inactive")]
    Inactive,
    #[display("cancelled")]
    Cancelled,
    #[display("expired")]
    Expired,
}

impl FromStr for SubscriptionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "trial" => Ok(Self::Trial),
            "inactive" => Ok(Self::Inactive),
            "cancelled" => Ok(Self::Cancelled),
            "expired" => Ok(Self::Expired),
            other => Err(AppError::internal(format!(
                "Invalid subscription status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub status: SubscriptionStatus,
    pub plan: String,
    pub expires_at: DateTime<Utc>,
}

impl Subscription {
    /// Paid-up: status `active` and not yet expired
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_active_requires_status_and_future_expiry() {
        let now = Utc::now();
        let mut sub = Subscription {
            status: SubscriptionStatus::Active,
            plan: "professional".to_string(),
            expires_at: now + Duration::days(1),
        };
        assert!(sub.is_active_at(now));

        sub.expires_at = now;
        assert!(!sub.is_active_at(now));

        sub.expires_at = now + Duration::days(1);
        sub.status = SubscriptionStatus::Cancelled;
        assert!(!sub.is_active_at(now));
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Trial,
            SubscriptionStatus::Expired,
        ] {
            assert_eq!(status.to_string().parse::<SubscriptionStatus>().unwrap(), status);
        }
    }
}
