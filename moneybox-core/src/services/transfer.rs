//! Transfer use case - move money between two accounts

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::ports::{AccountRepository, NotificationService};

/// Default remaining pay-in allowance below which the recipient is warned
pub const DEFAULT_PAY_IN_WARNING_THRESHOLD: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Moves money between accounts, notifies both owners when thresholds are
/// crossed, then saves both accounts
pub struct TransferMoney {
    repository: Arc<dyn AccountRepository>,
    notifications: Arc<dyn NotificationService>,
    pay_in_warning_threshold: Decimal,
}

impl TransferMoney {
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        notifications: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            repository,
            notifications,
            pay_in_warning_threshold: DEFAULT_PAY_IN_WARNING_THRESHOLD,
        }
    }

    /// Override the pay-in warning threshold
    pub fn with_pay_in_warning_threshold(mut self, threshold: Decimal) -> Self {
        self.pay_in_warning_threshold = threshold;
        self
    }

    /// Transfer `amount` from `from_id` to `to_id`
    ///
    /// Both accounts are saved through `AccountRepository::update_all`, so
    /// the pair is atomic exactly when the repository makes it so.
    pub fn execute(&self, from_id: Uuid, to_id: Uuid, amount: Decimal) -> Result<TransferResult> {
        if from_id == to_id {
            return Err(Error::SelfTransfer);
        }

        let mut from = self
            .repository
            .get_account_by_id(from_id)?
            .ok_or(Error::AccountNotFound(from_id))?;
        let mut to = self
            .repository
            .get_account_by_id(to_id)?
            .ok_or(Error::AccountNotFound(to_id))?;

        from.transfer(&mut to, amount)?;

        let pay_in_warning = to.reaching_pay_in_limit(self.pay_in_warning_threshold);
        if pay_in_warning {
            self.notifications
                .notify_approaching_pay_in_limit(&to.user().email)?;
        }

        let funds_low = from.is_below_threshold(amount);
        if funds_low {
            self.notifications.notify_funds_low(&from.user().email)?;
        }

        self.repository.update_all(&[from.clone(), to.clone()])?;

        Ok(TransferResult {
            from_account_id: from.id().to_string(),
            to_account_id: to.id().to_string(),
            amount: amount.to_string(),
            from_balance: from.balance().to_string(),
            to_balance: to.balance().to_string(),
            to_paid_in: to.paid_in().to_string(),
            pay_in_limit_notified: pay_in_warning,
            funds_low_notified: funds_low,
        })
    }
}

/// Outcome of a successful transfer
#[derive(Debug, Serialize)]
pub struct TransferResult {
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount: String,
    pub from_balance: String,
    pub to_balance: String,
    pub to_paid_in: String,
    pub pay_in_limit_notified: bool,
    pub funds_low_notified: bool,
}
