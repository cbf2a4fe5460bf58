mod config;
mod engine;
mod ledger;
mod models;
mod providers;
mod sync;
mod types;

use std::io::stderr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::Config;
use crate::ledger::YnabClient;
use crate::providers::ProviderRegistry;
use crate::sync::SyncService;

/// Synchronizes bank transactions into a budgeting ledger.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, env = "BANK_SYNC_CONFIG", default_value = "config.json")]
    config: PathBuf,
    /// One of error, warn, info, debug, trace.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
    /// Keep running and sync on the configured interval instead of syncing once.
    #[arg(long)]
    schedule: bool
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(parse_log_level(&cli.log_level));

    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    let providers = ProviderRegistry::from_settings(&config.providers)
        .context("Failed to set up bank providers")?;

    if providers.is_empty() {
        warn!("No bank providers are configured, every account will fail to sync.");
    } else {
        info!("Registered {} bank providers.", providers.len());
    }

    let ledger = YnabClient::new(config.token.as_str(), config.api_url.as_str(), config.request_timeout())
        .context("Failed to set up the ledger client")?;

    let service = SyncService::new(config.accounts.clone(), providers, Arc::new(ledger))
        .with_lookback_days(config.lookback_days);

    if cli.schedule {
        info!("Starting in scheduled mode (will sync accounts every {} minutes).", config.sync_interval_minutes);
        service.run_on_schedule(config.sync_interval()).await;
    } else {
        info!("Starting in one-shot mode (will sync once and exit).");
        service.sync().await;
    }

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

fn setup_logging(level: LevelFilter) {
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
