//! Transfer command - move money between accounts

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

use super::{get_context, parse_account_id, parse_amount, Logger};
use crate::output::{money, warning};

pub fn run(
    logger: &Logger,
    from: &str,
    to: &str,
    amount: &str,
    yes: bool,
    json: bool,
) -> Result<()> {
    let from = parse_account_id(from)?;
    let to = parse_account_id(to)?;
    let amount = parse_amount(amount)?;

    let ctx = get_context(logger)?;

    // Confirm unless --yes (JSON mode is non-interactive)
    if !yes && !json {
        warning(&format!(
            "\nThis will transfer {} from {} to {}.",
            money(&amount.to_string()),
            from,
            to
        ));

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let result = ctx.transfer_money.execute(from, to, amount)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("\n{} Transferred {}", "✓".green(), money(&result.amount));
    println!("  From balance: {}", money(&result.from_balance));
    println!("  To balance: {}", money(&result.to_balance));
    println!("  Recipient paid in: {}", money(&result.to_paid_in));
    if result.pay_in_limit_notified {
        println!("  {}", "Recipient is approaching the pay-in limit - notified".yellow());
    }
    if result.funds_low_notified {
        println!("  {}", "Sender funds low - notified".yellow());
    }

    Ok(())
}
