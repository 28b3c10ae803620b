//! Console notification delivery
//!
//! Stands in for email delivery: alerts are printed to stderr so JSON on
//! stdout stays machine-readable. Each alert is also recorded in the
//! activity log by kind, without the recipient.

use colored::Colorize;
use moneybox_core::domain::result::Result;
use moneybox_core::ports::{NotificationKind, NotificationService};
use moneybox_core::LogEvent;

use crate::commands::{log_event, Logger};

pub struct ConsoleNotifier {
    logger: Logger,
}

impl ConsoleNotifier {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    fn deliver(&self, kind: NotificationKind, email: &str) -> Result<()> {
        let message = match kind {
            NotificationKind::FundsLow => "your funds are running low",
            NotificationKind::ApproachingPayInLimit => {
                "your account is approaching its pay-in limit"
            }
        };
        eprintln!("{} to {}: {}", "Notification".yellow().bold(), email, message);
        log_event(&self.logger, LogEvent::notification(kind));
        Ok(())
    }
}

impl NotificationService for ConsoleNotifier {
    fn notify_funds_low(&self, email: &str) -> Result<()> {
        self.deliver(NotificationKind::FundsLow, email)
    }

    fn notify_approaching_pay_in_limit(&self, email: &str) -> Result<()> {
        self.deliver(NotificationKind::ApproachingPayInLimit, email)
    }
}
