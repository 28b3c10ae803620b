//! Notification port - user alerts

use serde::{Deserialize, Serialize};

use crate::domain::result::Result;

/// Kind of alert sent to an account owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FundsLow,
    ApproachingPayInLimit,
}

impl NotificationKind {
    /// Label stored in the activity log
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::FundsLow => "funds_low",
            NotificationKind::ApproachingPayInLimit => "approaching_pay_in_limit",
        }
    }
}

/// Delivers alerts to account owners
///
/// Delivery guarantees belong to the implementation. An `Err` is treated as
/// fatal by the use cases and stops the operation before anything is saved.
pub trait NotificationService: Send + Sync {
    fn notify_funds_low(&self, email: &str) -> Result<()>;

    fn notify_approaching_pay_in_limit(&self, email: &str) -> Result<()>;
}
