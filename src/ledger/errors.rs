use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerApiError {
    #[error("Ledger request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Ledger rejected the request with status {status}: {name} ({detail})")]
    Api {
        status: u16,
        name: String,
        detail: String
    }
}
