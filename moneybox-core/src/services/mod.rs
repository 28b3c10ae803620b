//! Service layer - use cases and supporting services
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case.

mod account;
pub mod logging;
pub mod migration;
mod status;
mod transfer;
mod withdraw;

pub use account::{AccountService, OpenAccountResult};
pub use logging::{LogEntry, LogEvent, LogSummary, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use status::{AccountSummary, StatusService, StatusSummary};
pub use transfer::{TransferMoney, TransferResult, DEFAULT_PAY_IN_WARNING_THRESHOLD};
pub use withdraw::{WithdrawMoney, WithdrawResult};
