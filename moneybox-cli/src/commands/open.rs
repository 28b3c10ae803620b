//! Open command - create a new account

use anyhow::Result;
use dialoguer::Input;
use rust_decimal::Decimal;

use super::{get_context, parse_amount, Logger};
use crate::output::{money, success};

pub fn run(
    logger: &Logger,
    email: Option<String>,
    balance: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context(logger)?;

    // Get email interactively if not provided
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let initial_balance = match balance {
        Some(b) => parse_amount(&b)?,
        None => Decimal::ZERO,
    };

    let result = ctx.account_service.open_account(&email, initial_balance)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    success("Account opened");
    println!("  Account ID: {}", result.account_id);
    println!("  Owner: {}", result.email);
    println!("  Balance: {}", money(&result.balance));

    Ok(())
}
