mod errors;
mod transaction;

use serde::{Deserialize, Serialize};

pub use errors::InvalidRecordError;
pub use transaction::{LedgerTransaction, TransactionRecord, TransactionUpdate};

/// Clearing state of a transaction as the ledger understands it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearedStatus {
    Cleared,
    Uncleared,
    Reconciled
}
