use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider [{slug}] is missing setting '{key}'")]
    MissingSetting {
        slug: String,
        key: String
    },
    #[error("Could not read export at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: io::Error
    },
    #[error("Malformed export: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed row {line} in export: {reason}")]
    MalformedRow {
        line: usize,
        reason: String
    },
    #[error("Provider task failed: {0}")]
    Task(#[from] JoinError)
}
