use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MilliunitsError {
    #[error("Milliunits error: {0}")]
    InvalidFormat(String),
    #[error("Milliunits error: {0}")]
    ParseInt(#[from] ParseIntError),
    #[error("Milliunits error: Overflow")]
    Overflow
}
