//! Status command - show accounts and balances

use anyhow::Result;
use colored::Colorize;

use super::{get_context, Logger};
use crate::output::{create_table, money};

pub fn run(logger: &Logger, json: bool) -> Result<()> {
    let ctx = get_context(logger)?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Ledger Status".bold());
    println!();
    println!("Accounts: {}", status.total_accounts);
    println!("Total balance: {}", money(&status.total_balance));
    println!("Pay-in limit per account: {}", money(&status.pay_in_limit));
    println!();

    if status.accounts.is_empty() {
        println!("{}", "No accounts yet. Create one with `mb open`.".dimmed());
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Account", "Owner", "Balance", "Withdrawn", "Paid in", "Headroom"]);
    for account in &status.accounts {
        table.add_row(vec![
            account.id.clone(),
            account.email.clone(),
            money(&account.balance),
            money(&account.withdrawn),
            money(&account.paid_in),
            money(&account.pay_in_headroom),
        ]);
    }
    println!("{}", table);

    Ok(())
}
