//! Account domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::{Error, Result};
use super::user::User;

/// Lifetime cap on money an account may receive through transfers
pub const PAY_IN_LIMIT: Decimal = Decimal::from_parts(4000, 0, 0, false, 0);

/// Decimal places an amount may carry; storage keeps exactly this many
pub const AMOUNT_SCALE: u32 = 4;

/// Largest amount accepted for a single operation or opening balance (10^12)
///
/// Balances only grow through pay-ins, which `PAY_IN_LIMIT` bounds, so every
/// stored total stays well inside `DECIMAL(18,4)`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// A ledger account owned by a user
///
/// Fields are private so that balance, withdrawn and paid-in totals only move
/// through `withdraw` and `transfer`. Adapters rebuild stored accounts with
/// [`Account::restore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    id: Uuid,
    user: User,
    balance: Decimal,
    /// Total that ever left the account, by withdrawal or outgoing transfer
    withdrawn: Decimal,
    /// Total received through incoming transfers, bounded by `PAY_IN_LIMIT`
    paid_in: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Account {
    /// Open a new account with an initial balance
    pub fn new(id: Uuid, user: User, balance: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id,
            user,
            balance,
            withdrawn: Decimal::ZERO,
            paid_in: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Open a new account with a fresh id
    pub fn open(user: User, balance: Decimal) -> Self {
        Self::new(Uuid::new_v4(), user, balance)
    }

    /// Rebuild an account from stored state
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        user: User,
        balance: Decimal,
        withdrawn: Decimal,
        paid_in: Decimal,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user,
            balance,
            withdrawn,
            paid_in,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn withdrawn(&self) -> Decimal {
        self.withdrawn
    }

    pub fn paid_in(&self) -> Decimal {
        self.paid_in
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Take money out of the account
    pub fn withdraw(&mut self, amount: Decimal) -> Result<()> {
        ensure_positive(amount)?;
        self.ensure_covers(amount)?;

        self.balance -= amount;
        self.withdrawn += amount;
        self.touch();
        Ok(())
    }

    /// Move money from this account into `to`
    ///
    /// Every check runs before either account is touched, so a failed
    /// transfer leaves both accounts exactly as they were.
    pub fn transfer(&mut self, to: &mut Account, amount: Decimal) -> Result<()> {
        if self.id == to.id {
            return Err(Error::SelfTransfer);
        }
        ensure_positive(amount)?;
        self.ensure_covers(amount)?;
        to.ensure_can_receive(amount)?;

        self.balance -= amount;
        self.withdrawn += amount;
        self.touch();

        to.balance += amount;
        to.paid_in += amount;
        to.touch();
        Ok(())
    }

    /// True when the balance is below `threshold`
    pub fn is_below_threshold(&self, threshold: Decimal) -> bool {
        self.balance < threshold
    }

    /// True when the remaining pay-in allowance is below `threshold`
    pub fn reaching_pay_in_limit(&self, threshold: Decimal) -> bool {
        self.pay_in_headroom() < threshold
    }

    /// Amount this account can still receive before hitting `PAY_IN_LIMIT`
    pub fn pay_in_headroom(&self) -> Decimal {
        PAY_IN_LIMIT - self.paid_in
    }

    fn ensure_covers(&self, amount: Decimal) -> Result<()> {
        if self.balance < amount {
            return Err(Error::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        Ok(())
    }

    fn ensure_can_receive(&self, amount: Decimal) -> Result<()> {
        let within_limit = self
            .paid_in
            .checked_add(amount)
            .is_some_and(|total| total <= PAY_IN_LIMIT);
        if !within_limit {
            return Err(Error::PayInLimitExceeded {
                requested: amount,
                remaining: self.pay_in_headroom(),
            });
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Reject amounts the ledger cannot store exactly
///
/// Zero passes; callers moving money also need [`ensure_positive`].
pub fn ensure_storable(amount: Decimal) -> Result<()> {
    if amount.normalize().scale() > AMOUNT_SCALE || amount.abs() > MAX_AMOUNT {
        return Err(Error::InvalidAmount(amount));
    }
    Ok(())
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(amount));
    }
    ensure_storable(amount)
}
