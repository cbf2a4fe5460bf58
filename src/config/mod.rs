mod errors;
#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::ledger::DEFAULT_API_URL;
use crate::providers::ProviderSettings;

pub use errors::ConfigError;

/// One week.
const MAX_SYNC_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Application configuration, read from a JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Personal access token for the ledger API.
    pub token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Settings blocks keyed by provider slug.
    #[serde(default)]
    pub providers: HashMap<String, ProviderSettings>,
    pub accounts: Vec<AccountConfig>,
    #[serde(default = "default_sync_interval_minutes")]
    pub sync_interval_minutes: u64,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64
}

/// Pairs one bank account with one ledger account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountConfig {
    pub budget_id: String,
    /// Slug of the provider serving this bank account.
    pub provider: String,
    pub source_account_number: String,
    pub target_account_id: String,
    #[serde(default)]
    pub match_new_transactions_with_uncleared: bool
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_sync_interval_minutes() -> u64 {
    30
}

fn default_lookback_days() -> u32 {
    7
}

fn default_request_timeout_seconds() -> u64 {
    30
}

impl Config {
    /// Reads and validates the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source
        })?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;

        Ok(config)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_minutes.saturating_mul(60))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::Invalid("token must not be empty".to_string()));
        }

        if self.sync_interval_minutes == 0 {
            return Err(ConfigError::Invalid("syncIntervalMinutes must be positive".to_string()));
        }

        if self.sync_interval_minutes > MAX_SYNC_INTERVAL_MINUTES {
            return Err(ConfigError::Invalid(format!("syncIntervalMinutes must be at most {MAX_SYNC_INTERVAL_MINUTES}")));
        }

        if self.lookback_days == 0 {
            return Err(ConfigError::Invalid("lookbackDays must be positive".to_string()));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("requestTimeoutSeconds must be positive".to_string()));
        }

        for (index, account) in self.accounts.iter().enumerate() {
            let fields = [
                ("budgetId", &account.budget_id),
                ("provider", &account.provider),
                ("sourceAccountNumber", &account.source_account_number),
                ("targetAccountId", &account.target_account_id),
            ];

            if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!("accounts[{index}].{name} must not be empty")));
            }
        }

        Ok(())
    }
}
