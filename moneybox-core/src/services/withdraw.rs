//! Withdraw use case - take money out of one account

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::ports::{AccountRepository, NotificationService};

/// Withdraws from an account, warns the owner when funds run low, then saves
pub struct WithdrawMoney {
    repository: Arc<dyn AccountRepository>,
    notifications: Arc<dyn NotificationService>,
}

impl WithdrawMoney {
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        notifications: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            repository,
            notifications,
        }
    }

    /// Withdraw `amount` from `account_id`
    ///
    /// The funds-low check uses the withdrawn amount as its threshold: the
    /// owner is warned when what is left is less than what was just taken.
    pub fn execute(&self, account_id: Uuid, amount: Decimal) -> Result<WithdrawResult> {
        let mut account = self
            .repository
            .get_account_by_id(account_id)?
            .ok_or(Error::AccountNotFound(account_id))?;

        account.withdraw(amount)?;

        let funds_low = account.is_below_threshold(amount);
        if funds_low {
            self.notifications.notify_funds_low(&account.user().email)?;
        }

        self.repository.update(&account)?;

        Ok(WithdrawResult {
            account_id: account.id().to_string(),
            amount: amount.to_string(),
            balance: account.balance().to_string(),
            withdrawn: account.withdrawn().to_string(),
            funds_low_notified: funds_low,
        })
    }
}

/// Outcome of a successful withdrawal
#[derive(Debug, Serialize)]
pub struct WithdrawResult {
    pub account_id: String,
    pub amount: String,
    pub balance: String,
    pub withdrawn: String,
    pub funds_low_notified: bool,
}
