use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const FREQUENCIES: &[&str] = &["monthly", "quarterly", "yearly"];

/// Engine-wide settings persisted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Currency given to claims that do not name one.
    #[serde(default = "Config::default_currency_value")]
    pub currency: String,
    #[serde(default = "Config::default_frequency_value")]
    pub default_frequency: String,
    #[serde(default)]
    pub accounts: AccountsConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the claim book. Defaults to the platform data dir.
    pub storage_root: Option<PathBuf>,

    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Tracing directive used when `RUST_LOG` is unset, e.g. `claimright=debug`.
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency_value(),
            default_frequency: Self::default_frequency_value(),
            accounts: AccountsConfig::default(),
            storage_root: None,
            backup_retention: Self::default_backup_retention(),
            log_filter: None,
        }
    }
}

impl Config {
    pub fn default_currency_value() -> String {
        "USD".into()
    }

    pub fn default_frequency_value() -> String {
        "monthly".into()
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn resolve_storage_root(&self) -> PathBuf {
        if let Some(path) = &self.storage_root {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("claimright")
    }

    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let currency = self.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Invalid(format!(
                "currency `{}` is not a three-letter ISO code",
                self.currency
            )));
        }
        let frequency = self.default_frequency.trim().to_ascii_lowercase();
        if !FREQUENCIES.contains(&frequency.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "default frequency `{}` must be one of {}",
                self.default_frequency,
                FREQUENCIES.join(", ")
            )));
        }
        if self.backup_retention == 0 {
            return Err(ConfigError::Invalid(
                "backup retention must keep at least one backup".into(),
            ));
        }
        self.accounts.validate()
    }
}

/// One chart-of-accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSetting {
    pub code: String,
    pub name: String,
}

impl AccountSetting {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Accounts used when posting amortization journals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsConfig {
    pub prepaid_asset: AccountSetting,
    pub deferred_revenue: AccountSetting,
    pub default_expense: AccountSetting,
    pub default_revenue: AccountSetting,
    /// Revenue account for liability claims derived from a ledger entry.
    pub ledger_revenue: AccountSetting,
    /// Expense accounts keyed by ledger category. Entries here are layered on
    /// top of the built-in category chart.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub category_expense: BTreeMap<String, AccountSetting>,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            prepaid_asset: AccountSetting::new("1400", "Prepaid Expenses"),
            deferred_revenue: AccountSetting::new("2400", "Deferred Revenue"),
            default_expense: AccountSetting::new("5990", "General Expense"),
            default_revenue: AccountSetting::new("4100", "Sales Revenue"),
            ledger_revenue: AccountSetting::new("4200", "Service Revenue"),
            category_expense: BTreeMap::new(),
        }
    }
}

impl AccountsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let base = [
            ("prepaid_asset", &self.prepaid_asset),
            ("deferred_revenue", &self.deferred_revenue),
            ("default_expense", &self.default_expense),
            ("default_revenue", &self.default_revenue),
            ("ledger_revenue", &self.ledger_revenue),
        ];
        let categories = self
            .category_expense
            .iter()
            .map(|(category, account)| (category.as_str(), account));
        for (label, account) in base.into_iter().chain(categories) {
            if account.code.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "account `{label}` has an empty code"
                )));
            }
        }
        if self.prepaid_asset.code == self.default_expense.code
            || self.deferred_revenue.code == self.default_revenue.code
        {
            return Err(ConfigError::Invalid(
                "debit and credit accounts of a claim type must differ".into(),
            ));
        }
        Ok(())
    }
}
