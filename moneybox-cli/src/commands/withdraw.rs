//! Withdraw command - take money out of an account

use anyhow::Result;
use colored::Colorize;

use super::{get_context, parse_account_id, parse_amount, Logger};
use crate::output::money;

pub fn run(logger: &Logger, account_id: &str, amount: &str, json: bool) -> Result<()> {
    let account_id = parse_account_id(account_id)?;
    let amount = parse_amount(amount)?;

    let ctx = get_context(logger)?;
    let result = ctx.withdraw_money.execute(account_id, amount)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{} Withdrew {}", "✓".green(), money(&result.amount));
    println!("  Balance: {}", money(&result.balance));
    println!("  Total withdrawn: {}", money(&result.withdrawn));
    if result.funds_low_notified {
        println!("  {}", "Funds low - owner notified".yellow());
    }

    Ok(())
}
