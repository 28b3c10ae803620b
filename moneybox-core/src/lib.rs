//! Moneybox Core - ledger rules for withdrawals and transfers
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Account, User) and their invariants
//! - **ports**: Traits for external dependencies (AccountRepository, NotificationService)
//! - **services**: Use cases (WithdrawMoney, TransferMoney) and supporting services
//! - **adapters**: Concrete implementations (DuckDB, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbAccountRepository;
use config::Config;
use ports::{AccountRepository, NotificationService};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{Account, User, PAY_IN_LIMIT};
pub use services::{LogEvent, LoggingService};

/// Database file holding users and accounts
pub const LEDGER_DB_FILENAME: &str = "moneybox.duckdb";

/// Main context for Moneybox operations
///
/// Wires the DuckDB repository and the caller's notification service into
/// every use case.
pub struct MoneyboxContext {
    pub config: Config,
    pub repository: Arc<DuckDbAccountRepository>,
    pub account_service: AccountService,
    pub status_service: StatusService,
    pub withdraw_money: WithdrawMoney,
    pub transfer_money: TransferMoney,
}

impl MoneyboxContext {
    /// Create a new context rooted at `data_dir`
    pub fn new(data_dir: &Path, notifications: Arc<dyn NotificationService>) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let repository = Arc::new(DuckDbAccountRepository::new(
            &data_dir.join(LEDGER_DB_FILENAME),
        )?);
        repository.ensure_schema()?;

        let accounts: Arc<dyn AccountRepository> = repository.clone();
        let account_service = AccountService::new(Arc::clone(&accounts));
        let status_service = StatusService::new(Arc::clone(&accounts));
        let withdraw_money = WithdrawMoney::new(Arc::clone(&accounts), Arc::clone(&notifications));
        let transfer_money = TransferMoney::new(accounts, notifications)
            .with_pay_in_warning_threshold(config.pay_in_warning_threshold);

        Ok(Self {
            config,
            repository,
            account_service,
            status_service,
            withdraw_money,
            transfer_money,
        })
    }
}
