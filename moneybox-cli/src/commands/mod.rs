//! CLI command implementations

pub mod logs;
pub mod open;
pub mod status;
pub mod transfer;
pub mod withdraw;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use uuid::Uuid;

use moneybox_core::{LogEvent, LoggingService, MoneyboxContext};

use crate::notifier::ConsoleNotifier;

/// Activity log shared by a command and its notifier; None when it could not be opened
pub type Logger = Option<Arc<LoggingService>>;

/// Open the activity log
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Logger {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, env!("CARGO_PKG_VERSION"))
        .ok()
        .map(Arc::new)
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Logger, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(&event);
    }
}

/// Get the data directory from MONEYBOX_DIR or default to ~/.moneybox
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("MONEYBOX_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".moneybox"))
        .ok_or_else(|| anyhow!("Could not find home directory; set MONEYBOX_DIR"))
}

/// Get or create the moneybox context; alerts are printed and logged
pub fn get_context(logger: &Logger) -> Result<MoneyboxContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    MoneyboxContext::new(&data_dir, Arc::new(ConsoleNotifier::new(logger.clone())))
        .context("Failed to initialize moneybox context")
}

/// Parse an account id argument
pub fn parse_account_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| anyhow!("Invalid account ID: {}", value))
}

/// Parse an amount argument
pub fn parse_amount(value: &str) -> Result<Decimal> {
    value
        .trim()
        .trim_start_matches('$')
        .parse::<Decimal>()
        .map_err(|_| anyhow!("Invalid amount: {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("200").unwrap(), Decimal::from(200));
        assert_eq!(parse_amount(" $12.50 ").unwrap(), Decimal::new(1250, 2));
        assert!(parse_amount("twelve").is_err());
    }

    #[test]
    fn test_parse_account_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_account_id(&id.to_string()).unwrap(), id);
        assert!(parse_account_id("not-a-uuid").is_err());
    }
}
