use thiserror::Error;

use crate::ledger::LedgerApiError;
use crate::models::InvalidRecordError;
use crate::providers::ProviderError;

/// Failure of one account's sync. Never fatal to the other accounts.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Provider '{slug}' not recognized")]
    UnknownProvider {
        slug: String
    },
    #[error(transparent)]
    InvalidRecord(#[from] InvalidRecordError),
    #[error("Bank provider failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("Ledger failed: {0}")]
    Ledger(#[from] LedgerApiError)
}
