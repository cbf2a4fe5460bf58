use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read configuration at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: io::Error
    },
    #[error("Configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Configuration is invalid: {0}")]
    Invalid(String)
}
