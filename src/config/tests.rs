use super::{Config, ConfigError};

use std::fs;
use std::time::Duration;

use anyhow::Result;
use tempfile::NamedTempFile;

const MINIMAL: &str = r#"{
    "token": "secret",
    "accounts": [
        {
            "budgetId": "budget-1",
            "provider": "csv",
            "sourceAccountNumber": "160-0000000123456-78",
            "targetAccountId": "account-1"
        }
    ]
}"#;

#[test]
fn test_minimal_configuration_gets_defaults() -> Result<()> {
    let config = Config::from_json(MINIMAL)?;

    assert_eq!(config.api_url, "https://api.youneedabudget.com/v1");
    assert_eq!(config.sync_interval(), Duration::from_secs(30 * 60));
    assert_eq!(config.lookback_days, 7);
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert!(config.providers.is_empty());
    assert!(!config.accounts[0].match_new_transactions_with_uncleared);

    Ok(())
}

#[test]
fn test_full_configuration_is_read_from_file() -> Result<()> {
    let file = NamedTempFile::new()?;
    fs::write(file.path(), r#"{
        "token": "secret",
        "apiUrl": "http://localhost:8080/v1",
        "syncIntervalMinutes": 5,
        "lookbackDays": 14,
        "requestTimeoutSeconds": 10,
        "providers": { "csv": { "directory": "/var/lib/exports" } },
        "accounts": [
            {
                "budgetId": "budget-1",
                "provider": "csv",
                "sourceAccountNumber": "42",
                "targetAccountId": "account-1",
                "matchNewTransactionsWithUncleared": true
            }
        ]
    }"#)?;

    let config = Config::load(file.path())?;

    assert_eq!(config.api_url, "http://localhost:8080/v1");
    assert_eq!(config.sync_interval(), Duration::from_secs(300));
    assert_eq!(config.lookback_days, 14);
    assert_eq!(config.providers["csv"]["directory"], "/var/lib/exports");
    assert!(config.accounts[0].match_new_transactions_with_uncleared);

    Ok(())
}

#[test]
fn test_missing_file_is_reported_with_its_path() {
    let result = Config::load(std::path::Path::new("does-not-exist.json"));

    match result {
        Err(error @ ConfigError::Io { .. }) => assert!(error.to_string().contains("does-not-exist.json")),
        other => panic!("Unexpected result {other:?}")
    }
}

#[test]
fn test_malformed_json_is_rejected() {
    assert!(matches!(Config::from_json("{ \"token\": "), Err(ConfigError::Parse(_))));
    assert!(matches!(Config::from_json("{ \"token\": \"secret\" }"), Err(ConfigError::Parse(_))));
}

#[test]
fn test_invalid_values_are_rejected() {
    let empty_token = MINIMAL.replace("\"secret\"", "\"  \"");
    let zero_interval = MINIMAL.replace("\"token\"", "\"syncIntervalMinutes\": 0, \"token\"");
    let empty_account = MINIMAL.replace("\"account-1\"", "\"\"");

    assert!(matches!(Config::from_json(&empty_token), Err(ConfigError::Invalid(_))));
    assert!(matches!(Config::from_json(&zero_interval), Err(ConfigError::Invalid(_))));

    match Config::from_json(&empty_account) {
        Err(ConfigError::Invalid(message)) => assert_eq!(message, "accounts[0].targetAccountId must not be empty"),
        other => panic!("Unexpected result {other:?}")
    }
}

#[test]
fn test_interval_beyond_a_week_is_rejected() -> Result<()> {
    let huge_interval = MINIMAL.replace("\"token\"", "\"syncIntervalMinutes\": 18446744073709551615, \"token\"");
    let weekly = MINIMAL.replace("\"token\"", "\"syncIntervalMinutes\": 10080, \"token\"");

    match Config::from_json(&huge_interval) {
        Err(ConfigError::Invalid(message)) => assert_eq!(message, "syncIntervalMinutes must be at most 10080"),
        other => panic!("Unexpected result {other:?}")
    }

    assert_eq!(Config::from_json(&weekly)?.sync_interval(), Duration::from_secs(604800));

    Ok(())
}
