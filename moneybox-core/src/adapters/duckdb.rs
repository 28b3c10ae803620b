//! DuckDB repository implementation

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use duckdb::{params, Connection};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{ensure_storable, Account, User};
use crate::migrations::MIGRATIONS;
use crate::ports::AccountRepository;
use crate::services::MigrationService;

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const SELECT_ACCOUNTS: &str = "SELECT a.account_id, a.user_id, u.email,
        CAST(a.balance AS VARCHAR), CAST(a.withdrawn AS VARCHAR), CAST(a.paid_in AS VARCHAR),
        a.created_at, a.updated_at
 FROM sys_accounts a
 JOIN sys_users u ON u.user_id = a.user_id";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// Account repository stored in a DuckDB file
pub struct DuckDbAccountRepository {
    conn: Mutex<Connection>,
}

impl DuckDbAccountRepository {
    /// Open (or create) the ledger database at `db_path`
    ///
    /// Includes retry logic with exponential backoff for file locking errors,
    /// which occur when another process holds the database open.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self { conn: Mutex::new(conn) });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[moneybox] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off; nothing here needs extensions
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()?;
        Ok(())
    }

    fn query_accounts(conn: &Connection, filter: Option<Uuid>) -> Result<Vec<Account>> {
        let rows: Vec<StoredAccount> = match filter {
            Some(id) => {
                let sql = format!("{} WHERE a.account_id = ?", SELECT_ACCOUNTS);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([id.to_string()], StoredAccount::from_row)?;
                rows.collect::<duckdb::Result<Vec<_>>>()?
            }
            None => {
                let sql = format!("{} ORDER BY a.created_at", SELECT_ACCOUNTS);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], StoredAccount::from_row)?;
                rows.collect::<duckdb::Result<Vec<_>>>()?
            }
        };

        rows.into_iter().map(StoredAccount::into_account).collect()
    }

    fn write_account(conn: &Connection, account: &Account) -> Result<()> {
        check_storable(account)?;
        let changed = conn.execute(
            "UPDATE sys_accounts SET
                balance = CAST(? AS DECIMAL(18,4)),
                withdrawn = CAST(? AS DECIMAL(18,4)),
                paid_in = CAST(? AS DECIMAL(18,4)),
                updated_at = ?
             WHERE account_id = ?",
            params![
                account.balance().to_string(),
                account.withdrawn().to_string(),
                account.paid_in().to_string(),
                account.updated_at().to_rfc3339(),
                account.id().to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(Error::AccountNotFound(account.id()));
        }
        Ok(())
    }
}

impl AccountRepository for DuckDbAccountRepository {
    fn get_account_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let conn = self.lock()?;
        Ok(Self::query_accounts(&conn, Some(id))?.into_iter().next())
    }

    fn update(&self, account: &Account) -> Result<()> {
        let conn = self.lock()?;
        Self::write_account(&conn, account)
    }

    /// Writes every account inside one database transaction
    fn update_all(&self, accounts: &[Account]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for account in accounts {
            // Dropping `tx` on error rolls the whole batch back
            Self::write_account(&tx, account)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn add_account(&self, account: &Account) -> Result<()> {
        check_storable(account)?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let user = account.user();

        tx.execute(
            "INSERT INTO sys_users (user_id, email) VALUES (?, ?)
             ON CONFLICT (user_id) DO NOTHING",
            params![user.id.to_string(), user.email],
        )?;
        tx.execute(
            "INSERT INTO sys_accounts (account_id, user_id, balance, withdrawn, paid_in,
                                       created_at, updated_at)
             VALUES (?, ?, CAST(? AS DECIMAL(18,4)), CAST(? AS DECIMAL(18,4)),
                     CAST(? AS DECIMAL(18,4)), ?, ?)",
            params![
                account.id().to_string(),
                user.id.to_string(),
                account.balance().to_string(),
                account.withdrawn().to_string(),
                account.paid_in().to_string(),
                account.created_at().to_rfc3339(),
                account.updated_at().to_rfc3339(),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn get_accounts(&self) -> Result<Vec<Account>> {
        let conn = self.lock()?;
        Self::query_accounts(&conn, None)
    }
}

/// Raw column values, converted to an `Account` outside the row callback
struct StoredAccount {
    account_id: String,
    user_id: String,
    email: String,
    balance: String,
    withdrawn: String,
    paid_in: String,
    created_at: String,
    updated_at: String,
}

impl StoredAccount {
    fn from_row(row: &duckdb::Row) -> duckdb::Result<Self> {
        Ok(Self {
            account_id: row.get(0)?,
            user_id: row.get(1)?,
            email: row.get(2)?,
            balance: row.get(3)?,
            withdrawn: row.get(4)?,
            paid_in: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn into_account(self) -> Result<Account> {
        let user = User::new(parse_uuid(&self.user_id)?, self.email);
        Ok(Account::restore(
            parse_uuid(&self.account_id)?,
            user,
            parse_decimal(&self.balance)?,
            parse_decimal(&self.withdrawn)?,
            parse_decimal(&self.paid_in)?,
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
        ))
    }
}

/// The amount columns are DECIMAL(18,4); refuse anything the cast would round
fn check_storable(account: &Account) -> Result<()> {
    ensure_storable(account.balance())?;
    ensure_storable(account.withdrawn())?;
    ensure_storable(account.paid_in())
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| Error::database(format!("Invalid id '{}': {}", s, e)))
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    Decimal::from_str(s)
        .map(|d| d.normalize())
        .map_err(|e| Error::database(format!("Invalid amount '{}': {}", s, e)))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::database(format!("Invalid timestamp '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> DuckDbAccountRepository {
        let repo = DuckDbAccountRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        repo
    }

    #[test]
    fn test_add_and_get_account() {
        let repo = repo();
        let account = Account::open(User::with_email("email@email.com"), Decimal::new(100050, 2));

        repo.add_account(&account).unwrap();

        let stored = repo.get_account_by_id(account.id()).unwrap().unwrap();
        assert_eq!(stored.id(), account.id());
        assert_eq!(stored.user(), account.user());
        assert_eq!(stored.balance(), Decimal::new(100050, 2));
        assert_eq!(stored.withdrawn(), Decimal::ZERO);
        assert_eq!(stored.paid_in(), Decimal::ZERO);
    }

    #[test]
    fn test_get_missing_account_returns_none() {
        let repo = repo();
        assert!(repo.get_account_by_id(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_update_persists_totals() {
        let repo = repo();
        let mut account = Account::open(User::with_email("email@email.com"), Decimal::from(1000));
        repo.add_account(&account).unwrap();

        account.withdraw(Decimal::new(2005, 1)).unwrap();
        repo.update(&account).unwrap();

        let stored = repo.get_account_by_id(account.id()).unwrap().unwrap();
        assert_eq!(stored.balance(), Decimal::new(7995, 1));
        assert_eq!(stored.withdrawn(), Decimal::new(2005, 1));
    }

    #[test]
    fn test_update_unknown_account_fails() {
        let repo = repo();
        let account = Account::open(User::with_email("email@email.com"), Decimal::from(1));

        assert!(matches!(repo.update(&account), Err(Error::AccountNotFound(_))));
    }

    #[test]
    fn test_update_all_rolls_back_on_failure() {
        let repo = repo();
        let mut known = Account::open(User::with_email("a@example.com"), Decimal::from(50));
        repo.add_account(&known).unwrap();
        known.withdraw(Decimal::from(20)).unwrap();
        let unknown = Account::open(User::with_email("b@example.com"), Decimal::from(50));

        assert!(repo.update_all(&[known.clone(), unknown]).is_err());

        let stored = repo.get_account_by_id(known.id()).unwrap().unwrap();
        assert_eq!(stored.balance(), Decimal::from(50));
    }

    #[test]
    fn test_refuses_amounts_the_column_would_round() {
        let repo = repo();
        let account = Account::open(User::with_email("email@email.com"), Decimal::new(1, 5));

        assert!(matches!(repo.add_account(&account), Err(Error::InvalidAmount(_))));
        assert!(repo.get_accounts().unwrap().is_empty());
    }
}
