//! Integration tests for moneybox-core use cases
//!
//! These run the withdraw and transfer flows against a real DuckDB file.
//! Notification delivery is replaced at the trait level.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;
use uuid::Uuid;

use moneybox_core::adapters::duckdb::DuckDbAccountRepository;
use moneybox_core::adapters::memory::RecordingNotificationService;
use moneybox_core::domain::result::Result;
use moneybox_core::ports::{AccountRepository, NotificationKind, NotificationService};
use moneybox_core::services::{TransferMoney, WithdrawMoney};
use moneybox_core::{Account, Error, MoneyboxContext, User, LEDGER_DB_FILENAME};

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a test repository with schema initialized
fn create_test_repo(temp_dir: &TempDir) -> Arc<DuckDbAccountRepository> {
    let db_path = temp_dir.path().join("test.duckdb");
    let repo = DuckDbAccountRepository::new(&db_path).expect("Failed to create repository");
    repo.ensure_schema().expect("Failed to initialize schema");
    Arc::new(repo)
}

/// Add an account with the given balance and return its id
fn add_account(repo: &DuckDbAccountRepository, email: &str, balance: i64) -> Uuid {
    let account = Account::open(User::with_email(email), Decimal::from(balance));
    repo.add_account(&account).unwrap();
    account.id()
}

fn balance_of(repo: &DuckDbAccountRepository, id: Uuid) -> Decimal {
    repo.get_account_by_id(id).unwrap().unwrap().balance()
}

/// Notification service whose delivery always fails
struct FailingNotificationService;

impl NotificationService for FailingNotificationService {
    fn notify_funds_low(&self, _email: &str) -> Result<()> {
        Err(Error::notification("mail server unavailable"))
    }

    fn notify_approaching_pay_in_limit(&self, _email: &str) -> Result<()> {
        Err(Error::notification("mail server unavailable"))
    }
}

// ============================================================================
// Withdraw
// ============================================================================

#[test]
fn test_withdraw_persists_to_duckdb() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let notifier = Arc::new(RecordingNotificationService::new());
    let id = add_account(&repo, "email@email.com", 1000);

    let use_case = WithdrawMoney::new(repo.clone(), notifier.clone());
    use_case.execute(id, Decimal::from(200)).unwrap();

    let stored = repo.get_account_by_id(id).unwrap().unwrap();
    assert_eq!(stored.balance(), Decimal::from(800));
    assert_eq!(stored.withdrawn(), Decimal::from(200));
    assert!(notifier.sent().is_empty());
}

#[test]
fn test_withdraw_with_failed_notification_saves_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let id = add_account(&repo, "email@email.com", 1000);

    let use_case = WithdrawMoney::new(repo.clone(), Arc::new(FailingNotificationService));
    let err = use_case.execute(id, Decimal::from(600)).unwrap_err();

    assert!(matches!(err, Error::Notification(_)));
    assert_eq!(balance_of(&repo, id), Decimal::from(1000));
}

#[test]
fn test_fractional_amounts_stay_exact() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let notifier = Arc::new(RecordingNotificationService::new());
    let id = add_account(&repo, "email@email.com", 1);

    let use_case = WithdrawMoney::new(repo.clone(), notifier);
    for _ in 0..3 {
        use_case.execute(id, Decimal::new(1, 1)).unwrap();
    }

    assert_eq!(balance_of(&repo, id), Decimal::new(7, 1));
}

#[test]
fn test_amounts_finer_than_storage_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let notifier = Arc::new(RecordingNotificationService::new());
    let id = add_account(&repo, "email@email.com", 100);

    let use_case = WithdrawMoney::new(repo.clone(), notifier.clone());
    for _ in 0..10 {
        let err = use_case.execute(id, Decimal::new(4, 5)).unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(_)));
    }

    // Out of range for the column; must fail before any notification
    let err = use_case
        .execute(id, Decimal::from(100_000_000_000_000_i64))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidAmount(_)));
    assert!(notifier.sent().is_empty());

    // Four places round-trip exactly
    use_case.execute(id, Decimal::new(4, 4)).unwrap();
    let stored = repo.get_account_by_id(id).unwrap().unwrap();
    assert_eq!(stored.balance(), Decimal::new(999_996, 4));
    assert_eq!(stored.withdrawn(), Decimal::new(4, 4));
}

// ============================================================================
// Transfer
// ============================================================================

#[test]
fn test_transfer_persists_both_accounts() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let notifier = Arc::new(RecordingNotificationService::new());
    let from = add_account(&repo, "a@example.com", 5000);
    let to = add_account(&repo, "b@example.com", 0);

    let use_case = TransferMoney::new(repo.clone(), notifier);
    use_case.execute(from, to, Decimal::from(1000)).unwrap();

    assert_eq!(balance_of(&repo, from), Decimal::from(4000));
    let recipient = repo.get_account_by_id(to).unwrap().unwrap();
    assert_eq!(recipient.balance(), Decimal::from(1000));
    assert_eq!(recipient.paid_in(), Decimal::from(1000));
}

#[test]
fn test_pay_in_limit_holds_across_transfers() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let notifier = Arc::new(RecordingNotificationService::new());
    let from = add_account(&repo, "a@example.com", 10000);
    let to = add_account(&repo, "b@example.com", 500);

    let use_case = TransferMoney::new(repo.clone(), notifier.clone());
    let result = use_case.execute(from, to, Decimal::from(3700)).unwrap();
    assert!(result.pay_in_limit_notified);
    assert_eq!(
        notifier.count(NotificationKind::ApproachingPayInLimit, "b@example.com"),
        1
    );

    // Only 300 of allowance left
    let err = use_case.execute(from, to, Decimal::from(301)).unwrap_err();
    assert!(matches!(err, Error::PayInLimitExceeded { .. }));
    assert_eq!(balance_of(&repo, from), Decimal::from(6300));
    assert_eq!(balance_of(&repo, to), Decimal::from(4200));

    use_case.execute(from, to, Decimal::from(300)).unwrap();
    let recipient = repo.get_account_by_id(to).unwrap().unwrap();
    assert_eq!(recipient.pay_in_headroom(), Decimal::ZERO);
}

#[test]
fn test_transfer_with_failed_notification_saves_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let from = add_account(&repo, "a@example.com", 5000);
    let to = add_account(&repo, "b@example.com", 0);

    let use_case = TransferMoney::new(repo.clone(), Arc::new(FailingNotificationService));
    let err = use_case.execute(from, to, Decimal::from(3800)).unwrap_err();

    assert!(matches!(err, Error::Notification(_)));
    assert_eq!(balance_of(&repo, from), Decimal::from(5000));
    assert_eq!(balance_of(&repo, to), Decimal::ZERO);
}

// ============================================================================
// Context
// ============================================================================

#[test]
fn test_context_data_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let notifier = Arc::new(RecordingNotificationService::new());

    let (from, to) = {
        let ctx = MoneyboxContext::new(temp_dir.path(), notifier.clone()).unwrap();
        let a = ctx.account_service.open_account("a@example.com", Decimal::from(1000)).unwrap();
        let b = ctx.account_service.open_account("b@example.com", Decimal::ZERO).unwrap();
        let from = Uuid::parse_str(&a.account_id).unwrap();
        let to = Uuid::parse_str(&b.account_id).unwrap();
        ctx.transfer_money.execute(from, to, Decimal::from(250)).unwrap();
        (from, to)
    };

    assert!(temp_dir.path().join(LEDGER_DB_FILENAME).exists());

    let ctx = MoneyboxContext::new(temp_dir.path(), notifier).unwrap();
    let status = ctx.status_service.get_status().unwrap();
    assert_eq!(status.total_accounts, 2);
    assert_eq!(status.total_balance, "1000");

    let sender = ctx.repository.get_account_by_id(from).unwrap().unwrap();
    assert_eq!(sender.balance(), Decimal::from(750));
    assert_eq!(sender.withdrawn(), Decimal::from(250));
    let recipient = ctx.repository.get_account_by_id(to).unwrap().unwrap();
    assert_eq!(recipient.paid_in(), Decimal::from(250));
}
