//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "ledger": { "payInWarningThreshold": "500" },
//!   ...
//! }
//! ```
//! Other keys are ignored.

use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::services::DEFAULT_PAY_IN_WARNING_THRESHOLD;

/// Environment variable overriding the pay-in warning threshold
pub const PAY_IN_WARNING_ENV: &str = "MONEYBOX_PAY_IN_WARNING";

/// Raw settings.json structure
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    ledger: LedgerSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerSettings {
    #[serde(default)]
    pay_in_warning_threshold: Option<Decimal>,
}

/// Moneybox configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// Remaining pay-in allowance below which recipients are warned
    pub pay_in_warning_threshold: Decimal,
}

impl Config {
    /// Load config from the data directory
    ///
    /// `MONEYBOX_PAY_IN_WARNING` takes precedence over the settings file.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        let env_value = std::env::var(PAY_IN_WARNING_ENV).ok();
        Self::from_sources(&raw, env_value.as_deref())
    }

    fn from_sources(raw: &SettingsFile, env_value: Option<&str>) -> Result<Self> {
        let threshold = match env_value {
            Some(value) => Decimal::from_str(value.trim())
                .with_context(|| format!("Invalid {}: {}", PAY_IN_WARNING_ENV, value))?,
            None => raw
                .ledger
                .pay_in_warning_threshold
                .unwrap_or(DEFAULT_PAY_IN_WARNING_THRESHOLD),
        };

        if threshold < Decimal::ZERO {
            bail!("Pay-in warning threshold cannot be negative: {}", threshold);
        }

        Ok(Self {
            pay_in_warning_threshold: threshold,
        })
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }

    let content = std::fs::read_to_string(&settings_path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", settings_path.display()))
}
