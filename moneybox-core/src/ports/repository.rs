//! Repository port - account storage abstraction

use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::Account;

/// Account storage abstraction
///
/// Accounts cross this boundary as owned values: callers fetch a copy,
/// mutate it through the domain methods, and hand it back with `update`.
pub trait AccountRepository: Send + Sync {
    /// Get account by ID
    fn get_account_by_id(&self, id: Uuid) -> Result<Option<Account>>;

    /// Persist the full current state of an existing account
    fn update(&self, account: &Account) -> Result<()>;

    /// Persist several accounts
    ///
    /// The default writes them one by one with no guarantee across writes.
    /// Adapters that can do better commit them together.
    fn update_all(&self, accounts: &[Account]) -> Result<()> {
        for account in accounts {
            self.update(account)?;
        }
        Ok(())
    }

    /// Add a new account (and its user)
    fn add_account(&self, account: &Account) -> Result<()>;

    /// Get all accounts
    fn get_accounts(&self) -> Result<Vec<Account>>;
}
