mod errors;
mod ynab;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{LedgerTransaction, TransactionRecord, TransactionUpdate};

pub use errors::LedgerApiError;
pub use ynab::{YnabClient, DEFAULT_API_URL};

/// Outcome of a batch creation.
#[derive(Debug, Clone, Default)]
pub struct CreatedTransactions {
    pub created: Vec<LedgerTransaction>,
    /// Import ids the ledger already knew and therefore skipped.
    pub duplicate_import_ids: Vec<String>
}

/// Outcome of a batch update.
#[derive(Debug, Clone, Default)]
pub struct UpdatedTransactions {
    pub updated: Vec<LedgerTransaction>
}

/// The budgeting ledger the bank is synchronized into.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Lists the account's transactions dated on or after `since`.
    async fn list_transactions_since(&self, budget_id: &str, account_id: &str, since: NaiveDate) -> Result<Vec<LedgerTransaction>, LedgerApiError>;

    /// Creates all `records` in a single request.
    async fn create_transactions(&self, budget_id: &str, records: &[TransactionRecord]) -> Result<CreatedTransactions, LedgerApiError>;

    /// Updates all `records` in a single request.
    async fn update_transactions(&self, budget_id: &str, records: &[TransactionUpdate]) -> Result<UpdatedTransactions, LedgerApiError>;
}
