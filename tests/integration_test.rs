use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use anyhow::Result;
use tempfile::TempDir;

fn run_once(config_path: &Path) -> Result<Output> {
    let binary_path = env!("CARGO_BIN_EXE_bank-ledger-sync");

    Ok(Command::new(binary_path)
        .arg("--config")
        .arg(config_path)
        .arg("--log-level")
        .arg("info")
        .output()?)
}

#[test]
fn test_cli_fails_when_the_config_file_is_missing() -> Result<()> {
    let directory = TempDir::new()?;
    let output = run_once(&directory.path().join("missing.json"))?;

    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Failed to load configuration"), "stderr was: {stderr}");

    Ok(())
}

#[test]
fn test_cli_rejects_a_config_without_token() -> Result<()> {
    let directory = TempDir::new()?;
    let config_path = directory.path().join("config.json");
    fs::write(&config_path, r#"{ "token": "", "accounts": [] }"#)?;

    let output = run_once(&config_path)?;

    assert!(!output.status.success());

    Ok(())
}

#[test]
fn test_cli_logs_unknown_providers_and_still_exits_cleanly() -> Result<()> {
    let directory = TempDir::new()?;
    let config_path = directory.path().join("config.json");
    fs::write(&config_path, r#"{
        "token": "secret",
        "apiUrl": "http://127.0.0.1:9",
        "requestTimeoutSeconds": 2,
        "accounts": [
            {
                "budgetId": "budget-1",
                "provider": "no-such-bank",
                "sourceAccountNumber": "123",
                "targetAccountId": "account-1"
            }
        ]
    }"#)?;

    let output = run_once(&config_path)?;

    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Provider 'no-such-bank' not recognized"), "stderr was: {stderr}");
    assert!(stderr.contains("Synchronized 0 of 1 accounts"), "stderr was: {stderr}");

    Ok(())
}

#[test]
fn test_cli_contains_ledger_failures_to_the_account() -> Result<()> {
    let directory = TempDir::new()?;
    let exports = directory.path().join("exports");
    fs::create_dir(&exports)?;
    fs::write(exports.join("123.csv"), "date,amount,payee,memo,status\n")?;

    let config_path = directory.path().join("config.json");
    let config = serde_json::json!({
        "token": "secret",
        "apiUrl": "http://127.0.0.1:9",
        "requestTimeoutSeconds": 2,
        "providers": {
            "csv": { "directory": exports.to_string_lossy() }
        },
        "accounts": [
            {
                "budgetId": "budget-1",
                "provider": "csv",
                "sourceAccountNumber": "123",
                "targetAccountId": "account-1"
            }
        ]
    });
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    let output = run_once(&config_path)?;

    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Failed to sync account no. 123"), "stderr was: {stderr}");

    Ok(())
}
