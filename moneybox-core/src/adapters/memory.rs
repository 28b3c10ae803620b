//! In-memory adapters
//!
//! Used by tests and by hosts that embed the ledger without a database.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::Account;
use crate::ports::{AccountRepository, NotificationKind, NotificationService};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
}

/// Account repository backed by a `HashMap`
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with accounts
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let map = accounts.into_iter().map(|a| (a.id(), a)).collect();
        Self {
            accounts: Mutex::new(map),
        }
    }
}

impl AccountRepository for InMemoryAccountRepository {
    fn get_account_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        Ok(lock(&self.accounts)?.get(&id).cloned())
    }

    fn update(&self, account: &Account) -> Result<()> {
        let mut accounts = lock(&self.accounts)?;
        match accounts.get_mut(&account.id()) {
            Some(stored) => {
                *stored = account.clone();
                Ok(())
            }
            None => Err(Error::AccountNotFound(account.id())),
        }
    }

    /// Applies every update under one lock, or none if any account is unknown
    fn update_all(&self, updates: &[Account]) -> Result<()> {
        let mut accounts = lock(&self.accounts)?;
        if let Some(missing) = updates.iter().find(|a| !accounts.contains_key(&a.id())) {
            return Err(Error::AccountNotFound(missing.id()));
        }
        for account in updates {
            accounts.insert(account.id(), account.clone());
        }
        Ok(())
    }

    fn add_account(&self, account: &Account) -> Result<()> {
        let mut accounts = lock(&self.accounts)?;
        if accounts.contains_key(&account.id()) {
            return Err(Error::validation(format!(
                "Account already exists: {}",
                account.id()
            )));
        }
        accounts.insert(account.id(), account.clone());
        Ok(())
    }

    fn get_accounts(&self) -> Result<Vec<Account>> {
        let mut accounts: Vec<Account> = lock(&self.accounts)?.values().cloned().collect();
        accounts.sort_by_key(|a| a.created_at());
        Ok(accounts)
    }
}

/// A notification captured by [`RecordingNotificationService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub kind: NotificationKind,
    pub email: String,
}

/// Notification service that keeps every alert in memory
#[derive(Default)]
pub struct RecordingNotificationService {
    sent: Mutex<Vec<SentNotification>>,
}

impl RecordingNotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications sent so far, oldest first
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Number of notifications of `kind` sent to `email`
    pub fn count(&self, kind: NotificationKind, email: &str) -> usize {
        self.sent()
            .iter()
            .filter(|n| n.kind == kind && n.email == email)
            .count()
    }

    fn record(&self, kind: NotificationKind, email: &str) -> Result<()> {
        lock(&self.sent)?.push(SentNotification {
            kind,
            email: email.to_string(),
        });
        Ok(())
    }
}

impl NotificationService for RecordingNotificationService {
    fn notify_funds_low(&self, email: &str) -> Result<()> {
        self.record(NotificationKind::FundsLow, email)
    }

    fn notify_approaching_pay_in_limit(&self, email: &str) -> Result<()> {
        self.record(NotificationKind::ApproachingPayInLimit, email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use rust_decimal::Decimal;

    #[test]
    fn test_update_unknown_account_fails() {
        let repo = InMemoryAccountRepository::new();
        let account = Account::open(User::with_email("a@example.com"), Decimal::from(10));

        assert!(matches!(
            repo.update(&account),
            Err(Error::AccountNotFound(id)) if id == account.id()
        ));
    }

    #[test]
    fn test_update_all_is_all_or_nothing() {
        let known = Account::open(User::with_email("a@example.com"), Decimal::from(10));
        let repo = InMemoryAccountRepository::with_accounts([known.clone()]);

        let mut changed = known.clone();
        changed.withdraw(Decimal::from(5)).unwrap();
        let unknown = Account::open(User::with_email("b@example.com"), Decimal::from(10));

        assert!(repo.update_all(&[changed, unknown]).is_err());
        let stored = repo.get_account_by_id(known.id()).unwrap().unwrap();
        assert_eq!(stored.balance(), Decimal::from(10));
    }

    #[test]
    fn test_add_account_twice_fails() {
        let repo = InMemoryAccountRepository::new();
        let account = Account::open(User::with_email("a@example.com"), Decimal::from(10));

        repo.add_account(&account).unwrap();
        assert!(repo.add_account(&account).is_err());
        assert_eq!(repo.get_accounts().unwrap().len(), 1);
    }

    #[test]
    fn test_recording_notifications() {
        let notifier = RecordingNotificationService::new();
        notifier.notify_funds_low("a@example.com").unwrap();
        notifier.notify_approaching_pay_in_limit("b@example.com").unwrap();

        assert_eq!(notifier.sent().len(), 2);
        assert_eq!(notifier.count(NotificationKind::FundsLow, "a@example.com"), 1);
        assert_eq!(
            notifier.count(NotificationKind::ApproachingPayInLimit, "b@example.com"),
            1
        );
    }
}
