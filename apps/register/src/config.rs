//! # Register Configuration
//!
//! Store settings the register needs at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`register.toml`)
//! 3. Environment variables (`KASIR_*`)
//!
//! ## Example register.toml
//! ```toml
//! store_name = "Warung Sederhana"
//! currency_symbol = "Rp"
//! currency_decimals = 0
//! tax_rate_bps = 1000
//! catalog_path = "/var/lib/kasir/products.json"
//! ```
//!
//! Configuration is read-only once loaded.

use kasir_core::{Money, TaxRate, DEFAULT_TAX_RATE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{RegisterError, RegisterResult};

/// Largest supported number of currency decimal places.
pub const MAX_CURRENCY_DECIMALS: u8 = 4;

/// Register configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterConfig {
    /// Shown in the banner and on receipts.
    #[serde(default = "default_store_name")]
    pub store_name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Minor units per major unit as a power of ten (Rupiah: 0).
    #[serde(default)]
    pub currency_decimals: u8,

    /// Order tax in basis points, e.g. 1000 = 10%.
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Catalog file exported from the backend.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

fn default_store_name() -> String {
    "Kasir POS".to_string()
}

fn default_currency_symbol() -> String {
    "Rp".to_string()
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE.bps()
}

impl Default for RegisterConfig {
    fn default() -> Self {
        RegisterConfig {
            store_name: default_store_name(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: 0,
            tax_rate_bps: default_tax_rate_bps(),
            catalog_path: None,
        }
    }
}

impl RegisterConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing config file is not an error; an unreadable or invalid one is.
    pub fn load(config_path: Option<PathBuf>) -> RegisterResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading register config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Applies `KASIR_*` overrides from `lookup` (the process environment in
    /// production).
    ///
    /// Unparseable numbers are ignored and the previous value is kept.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("KASIR_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(rate) = lookup("KASIR_TAX_RATE") {
            if let Ok(pct) = rate.trim().parse::<f64>() {
                let rate = TaxRate::from_percentage(pct);
                debug!(tax_rate = %rate, "Overriding tax rate from environment");
                self.tax_rate_bps = rate.bps();
            }
        }

        if let Some(symbol) = lookup("KASIR_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(decimals) = lookup("KASIR_CURRENCY_DECIMALS") {
            if let Ok(d) = decimals.trim().parse::<u8>() {
                self.currency_decimals = d;
            }
        }

        if let Some(path) = lookup("KASIR_CATALOG_PATH") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.catalog_path = Some(PathBuf::from(path));
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RegisterResult<()> {
        kasir_core::validation::validate_tax_rate_bps(self.tax_rate_bps)
            .map_err(|e| RegisterError::InvalidConfig(e.to_string()))?;

        if self.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(RegisterError::InvalidConfig(format!(
                "currency_decimals must be at most {}, got {}",
                MAX_CURRENCY_DECIMALS, self.currency_decimals
            )));
        }

        Ok(())
    }

    /// `register.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "kasir", "pos")
            .map(|dirs| dirs.config_dir().join("register.toml"))
    }

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Formats an amount in minor units for display.
    ///
    /// Thousands are grouped with `.` and decimals follow a `,`, the way
    /// Rupiah prices are printed.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::Money;
    /// use kasir_register::config::RegisterConfig;
    ///
    /// let config = RegisterConfig::default();
    /// assert_eq!(config.format_currency(Money::from_minor(60500)), "Rp60.500");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let minor = amount.minor();
        let decimals = self.decimals();
        let divisor = 10_u64.pow(decimals);
        let magnitude = minor.unsigned_abs();
        let whole = group_thousands(magnitude / divisor);

        let digits = if decimals > 0 {
            format!(
                "{},{:0width$}",
                whole,
                magnitude % divisor,
                width = decimals as usize
            )
        } else {
            whole
        };

        format!(
            "{}{}{}",
            if minor < 0 { "-" } else { "" },
            self.currency_symbol,
            digits
        )
    }

    /// Reads a cashier-typed amount into minor units.
    ///
    /// Accepts what [`format_currency`](Self::format_currency) prints: an
    /// optional symbol, `.` between thousands groups and `,` before at most
    /// `currency_decimals` digits. With two decimals `12,5` is 1250 and
    /// `1.234` is 123400, while `12.5` is rejected.
    pub fn parse_amount(&self, input: &str) -> RegisterResult<Money> {
        let invalid = || RegisterError::command(format!("'{}' is not an amount", input));

        let text = input.trim();
        let (negative, text) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let text = match self.currency_symbol.as_str() {
            "" => text,
            symbol => text.strip_prefix(symbol).unwrap_or(text),
        };
        let (whole, fraction) = match text.split_once(',') {
            Some((_, "")) => return Err(invalid()),
            Some((whole, fraction)) => (whole, fraction),
            None => (text, ""),
        };

        let groups: Vec<&str> = whole.split('.').collect();
        let grouped = groups.iter().enumerate().all(|(i, group)| {
            let width_ok = match (groups.len(), i) {
                (1, _) => !group.is_empty(),
                (_, 0) => (1..=3).contains(&group.len()),
                _ => group.len() == 3,
            };
            width_ok && group.bytes().all(|b| b.is_ascii_digit())
        });
        let decimals = self.decimals() as usize;
        let fraction_ok =
            fraction.len() <= decimals && fraction.bytes().all(|b| b.is_ascii_digit());
        if !grouped || !fraction_ok {
            return Err(invalid());
        }

        let digits = format!("{}{:0<width$}", groups.concat(), fraction, width = decimals);
        let minor = digits.parse::<i64>().map_err(|_| invalid())?;
        let minor = if negative { -minor } else { minor };
        kasir_core::validation::validate_tendered_amount(minor)?;

        Ok(Money::from_minor(minor))
    }

    /// `currency_decimals` capped at [`MAX_CURRENCY_DECIMALS`], also for a
    /// config that never went through `validate()`.
    fn decimals(&self) -> u32 {
        self.currency_decimals.min(MAX_CURRENCY_DECIMALS) as u32
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
