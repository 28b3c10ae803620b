//! Status service - account summaries

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{Account, PAY_IN_LIMIT};
use crate::ports::AccountRepository;

/// Status service for account summaries
pub struct StatusService {
    repository: Arc<dyn AccountRepository>,
}

impl StatusService {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> Result<StatusSummary> {
        let accounts = self.repository.get_accounts()?;
        let total_balance: Decimal = accounts.iter().map(Account::balance).sum();

        Ok(StatusSummary {
            total_accounts: accounts.len() as i64,
            total_balance: total_balance.to_string(),
            pay_in_limit: PAY_IN_LIMIT.to_string(),
            accounts: accounts.iter().map(AccountSummary::from).collect(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_accounts: i64,
    pub total_balance: String,
    pub pay_in_limit: String,
    pub accounts: Vec<AccountSummary>,
}

#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub id: String,
    pub email: String,
    pub balance: String,
    pub withdrawn: String,
    pub paid_in: String,
    pub pay_in_headroom: String,
}

impl From<&Account> for AccountSummary {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id().to_string(),
            email: a.user().email.clone(),
            balance: a.balance().to_string(),
            withdrawn: a.withdrawn().to_string(),
            paid_in: a.paid_in().to_string(),
            pay_in_headroom: a.pay_in_headroom().to_string(),
        }
    }
}
