//! Moneybox CLI - account ledger in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod notifier;
mod output;

use commands::{logs, open, status, transfer, withdraw, Logger};
use moneybox_core::LogEvent;

/// Moneybox - withdrawals and transfers with a pay-in cap
#[derive(Parser)]
#[command(name = "mb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a new account
    Open {
        /// Owner's email address (receives notifications)
        #[arg(long)]
        email: Option<String>,
        /// Initial balance
        #[arg(long)]
        balance: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Withdraw money from an account
    Withdraw {
        /// Account ID
        account_id: String,
        /// Amount to withdraw
        amount: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transfer money between two accounts
    Transfer {
        /// Source account ID
        from: String,
        /// Destination account ID
        to: String,
        /// Amount to transfer
        amount: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show accounts and balances
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Open { .. } => "open",
            Commands::Withdraw { .. } => "withdraw",
            Commands::Transfer { .. } => "transfer",
            Commands::Status { .. } => "status",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.name();

    let logger = commands::get_logger();
    commands::log_event(&logger, LogEvent::command(command));

    match run(cli, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_event(&logger, LogEvent::failure(command, error_kind(&e)));
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Error label for the log; messages can carry amounts so only the kind is kept
fn error_kind(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<moneybox_core::Error>() {
        Some(moneybox_core::Error::SelfTransfer) => "self_transfer",
        Some(moneybox_core::Error::InsufficientFunds { .. }) => "insufficient_funds",
        Some(moneybox_core::Error::PayInLimitExceeded { .. }) => "pay_in_limit_exceeded",
        Some(moneybox_core::Error::AccountNotFound(_)) => "account_not_found",
        Some(moneybox_core::Error::InvalidAmount(_)) => "invalid_amount",
        Some(moneybox_core::Error::Notification(_)) => "notification_failed",
        Some(moneybox_core::Error::Database(_)) => "database_error",
        Some(moneybox_core::Error::Validation(_)) => "validation_error",
        None => "cli_error",
    }
}

fn run(cli: Cli, logger: &Logger) -> Result<()> {
    match cli.command {
        Commands::Open {
            email,
            balance,
            json,
        } => open::run(logger, email, balance, json),
        Commands::Withdraw {
            account_id,
            amount,
            json,
        } => withdraw::run(logger, &account_id, &amount, json),
        Commands::Transfer {
            from,
            to,
            amount,
            yes,
            json,
        } => transfer::run(logger, &from, &to, &amount, yes, json),
        Commands::Status { json } => status::run(logger, json),
        Commands::Logs { command } => logs::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_error_kind_labels_never_carry_amounts() {
        let err = anyhow::Error::from(moneybox_core::Error::InsufficientFunds {
            requested: Decimal::from(300),
            available: Decimal::from(200),
        });
        assert_eq!(error_kind(&err), "insufficient_funds");

        let err = anyhow::Error::from(moneybox_core::Error::InvalidAmount(Decimal::new(4, 5)))
            .context("Withdraw failed");
        assert_eq!(error_kind(&err), "invalid_amount");

        assert_eq!(error_kind(&anyhow::anyhow!("Invalid account ID: x")), "cli_error");
    }

    #[test]
    fn test_cli_parses_transfer() {
        let cli = Cli::try_parse_from(["mb", "transfer", "a", "b", "10", "--yes"]).unwrap();
        assert_eq!(cli.command.name(), "transfer");
        assert!(matches!(cli.command, Commands::Transfer { yes: true, json: false, .. }));
    }
}
