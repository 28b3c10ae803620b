//! Account service - open accounts for new users

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{ensure_storable, Account, User};
use crate::ports::AccountRepository;

/// Opens new accounts
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }

    /// Open an account for `email` with an initial balance
    pub fn open_account(
        &self,
        email: &str,
        initial_balance: Decimal,
    ) -> Result<OpenAccountResult> {
        if initial_balance < Decimal::ZERO {
            return Err(Error::InvalidAmount(initial_balance));
        }
        ensure_storable(initial_balance)?;

        let user = User::with_email(email.trim());
        user.validate().map_err(Error::validation)?;

        let account = Account::open(user, initial_balance);
        self.repository.add_account(&account)?;

        Ok(OpenAccountResult {
            account_id: account.id().to_string(),
            user_id: account.user().id.to_string(),
            email: account.user().email.clone(),
            balance: account.balance().to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct OpenAccountResult {
    pub account_id: String,
    pub user_id: String,
    pub email: String,
    pub balance: String,
}
