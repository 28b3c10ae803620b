//! Logs command - inspect and prune the activity log

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{Duration, TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::get_data_dir;
use crate::output::{create_table, success};
use moneybox_core::services::LogEntry;
use moneybox_core::LoggingService;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent activity
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only failed commands
        #[arg(long)]
        failures: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete old entries
    Clear {
        /// Delete entries older than N days
        #[arg(long, default_value = "30")]
        older_than_days: i64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Count commands, alerts and failures
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy the log database to a file
    Export {
        /// Destination path
        path: PathBuf,
    },
}

fn open_log() -> Result<LoggingService> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    LoggingService::new(&data_dir, env!("CARGO_PKG_VERSION"))
}

/// What happened, in one short phrase
fn describe(entry: &LogEntry) -> String {
    match (&entry.notification, &entry.failure) {
        (Some(kind), _) => format!("alert: {}", kind),
        (_, Some(kind)) => format!("failed: {}", kind).red().to_string(),
        _ => "ran".to_string(),
    }
}

pub fn run(command: LogsCommands) -> Result<()> {
    let log = open_log()?;

    match command {
        LogsCommands::List {
            limit,
            failures,
            json,
        } => {
            let entries = log.recent(limit, failures)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if entries.is_empty() {
                println!("No log entries found.");
                return Ok(());
            }

            let mut table = create_table();
            table.set_header(vec!["Time (UTC)", "Command", "Outcome"]);
            for entry in &entries {
                let time = Utc
                    .timestamp_millis_opt(entry.logged_at)
                    .single()
                    .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| entry.logged_at.to_string());
                table.add_row(vec![
                    time,
                    entry.command.clone().unwrap_or_default(),
                    describe(entry),
                ]);
            }
            println!("{}", table);
        }
        LogsCommands::Clear {
            older_than_days,
            force,
        } => {
            let prompt = format!("Delete log entries older than {} days?", older_than_days);
            if !force && !Confirm::new().with_prompt(prompt).default(false).interact()? {
                println!("Cancelled.");
                return Ok(());
            }

            let cutoff = Duration::try_days(older_than_days)
                .and_then(|age| Utc::now().checked_sub_signed(age))
                .ok_or_else(|| anyhow!("--older-than-days is out of range"))?;
            let deleted = log.delete_before(cutoff.timestamp_millis())?;
            success(&format!("Deleted {} log entries", deleted));
        }
        LogsCommands::Stats { json } => {
            let summary = log.summary()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            println!("{}", "Activity".bold());
            println!("  Commands run: {}", summary.commands);
            println!("  Alerts sent: {}", summary.notifications);
            println!("  Failures: {}", summary.failures);
            for (kind, count) in &summary.failures_by_kind {
                println!("    {}: {}", kind, count);
            }
            println!("  Log database: {}", log.db_path().display().to_string().dimmed());
        }
        LogsCommands::Export { path } => {
            log.export(&path)?;
            success(&format!("Exported logs to {}", path.display()));
        }
    }

    Ok(())
}
