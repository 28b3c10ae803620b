//! Activity log - what the ledger did, kept in logs.duckdb
//!
//! Entries record which command ran, which alerts went out and which rule
//! stopped a command. Emails, account ids and amounts are never written.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use chrono::Utc;
use duckdb::{params, Connection};
use serde::Serialize;

use crate::log_migrations::LOG_MIGRATIONS;
use crate::ports::NotificationKind;
use crate::services::MigrationService;

pub const LOG_DB_FILENAME: &str = "logs.duckdb";

const EVENT_COMMAND: &str = "command_executed";
const EVENT_FAILURE: &str = "command_failed";
const EVENT_NOTIFICATION: &str = "notification_sent";

/// Something worth recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    event: &'static str,
    command: Option<String>,
    notification: Option<NotificationKind>,
    failure: Option<String>,
}

impl LogEvent {
    /// A CLI command started
    pub fn command(command: &str) -> Self {
        Self {
            event: EVENT_COMMAND,
            command: Some(command.to_string()),
            notification: None,
            failure: None,
        }
    }

    /// A CLI command stopped with an error; `kind` is a label such as
    /// "insufficient_funds", never the error text
    pub fn failure(command: &str, kind: &str) -> Self {
        Self {
            event: EVENT_FAILURE,
            command: Some(command.to_string()),
            notification: None,
            failure: Some(kind.to_string()),
        }
    }

    /// An alert was delivered to an account owner
    pub fn notification(kind: NotificationKind) -> Self {
        Self {
            event: EVENT_NOTIFICATION,
            command: None,
            notification: Some(kind),
            failure: None,
        }
    }
}

/// A stored log row
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: i64,
    /// Unix milliseconds
    pub logged_at: i64,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    pub command: Option<String>,
    pub notification: Option<String>,
    pub failure: Option<String>,
}

/// Totals shown by `mb logs stats`
#[derive(Debug, Clone, Serialize)]
pub struct LogSummary {
    pub total_entries: u64,
    pub commands: u64,
    pub failures: u64,
    pub notifications: u64,
    /// Failure labels with their counts, most frequent first
    pub failures_by_kind: Vec<(String, u64)>,
}

/// Appends to and reads from the activity log
pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    app_version: String,
}

impl LoggingService {
    /// Open or create the log database in `data_dir`
    pub fn new(data_dir: &Path, app_version: impl Into<String>) -> Result<Self> {
        let db_path = data_dir.join(LOG_DB_FILENAME);
        let conn = Connection::open(&db_path)?;
        MigrationService::new(&conn, LOG_MIGRATIONS).run_pending()?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            app_version: app_version.into(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    pub fn log(&self, event: &LogEvent) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_logs
                (logged_at, app_version, platform, event, command, notification, failure)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                Utc::now().timestamp_millis(),
                &self.app_version,
                std::env::consts::OS,
                event.event,
                &event.command,
                event.notification.map(|kind| kind.as_str()),
                &event.failure,
            ],
        )?;
        Ok(())
    }

    /// Newest entries first; `failures_only` keeps just failed commands
    pub fn recent(&self, limit: usize, failures_only: bool) -> Result<Vec<LogEntry>> {
        let filter = if failures_only { "WHERE failure IS NOT NULL" } else { "" };
        let sql = format!(
            "SELECT id, logged_at, app_version, platform, event, command, notification, failure
             FROM sys_logs {} ORDER BY id DESC LIMIT ?",
            filter
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map([limit as i64], |row| {
                Ok(LogEntry {
                    id: row.get(0)?,
                    logged_at: row.get(1)?,
                    app_version: row.get(2)?,
                    platform: row.get(3)?,
                    event: row.get(4)?,
                    command: row.get(5)?,
                    notification: row.get(6)?,
                    failure: row.get(7)?,
                })
            })?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn summary(&self) -> Result<LogSummary> {
        let conn = self.lock()?;

        let (total, commands, failures, notifications): (i64, i64, i64, i64) = conn.query_row(
            "SELECT COUNT(*),
                    COUNT(*) FILTER (WHERE event = ?),
                    COUNT(*) FILTER (WHERE event = ?),
                    COUNT(*) FILTER (WHERE event = ?)
             FROM sys_logs",
            params![EVENT_COMMAND, EVENT_FAILURE, EVENT_NOTIFICATION],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

        let mut stmt = conn.prepare(
            "SELECT failure, COUNT(*) AS n FROM sys_logs
             WHERE failure IS NOT NULL
             GROUP BY failure ORDER BY n DESC, failure",
        )?;
        let failures_by_kind = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64)))?
            .collect::<duckdb::Result<Vec<_>>>()?;

        Ok(LogSummary {
            total_entries: total as u64,
            commands: commands as u64,
            failures: failures as u64,
            notifications: notifications as u64,
            failures_by_kind,
        })
    }

    /// Delete entries logged before `cutoff_ms` (unix ms)
    pub fn delete_before(&self, cutoff_ms: i64) -> Result<u64> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM sys_logs WHERE logged_at < ?", [cutoff_ms])?;
        Ok(deleted as u64)
    }

    /// Copy the log database to `output_path`
    pub fn export(&self, output_path: &Path) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch("CHECKPOINT")?;
        std::fs::copy(&self.db_path, output_path)?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
