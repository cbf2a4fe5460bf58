use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::ClearedStatus;
use crate::types::{ImportId, LedgerAccountId, Milliunits};

/// Builds the memo marker left on a ledger transaction that absorbed a bank transaction
/// through uncleared matching.
pub fn duplicate_marker(import_id: &str) -> String {
    format!("[duplicate:{import_id}]")
}

/// A provider-agnostic bank movement, ready to be written to the ledger.
///
/// Providers fill in everything except `account_id`, which the orchestrator stamps
/// once it knows which ledger account the bank account is paired with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// The target ledger account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<LedgerAccountId>,
    /// Value date of the movement.
    pub date: NaiveDate,
    /// Signed amount, positive for inflows.
    pub amount: Milliunits,
    /// Counterparty, only known for outflows.
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    pub cleared: ClearedStatus,
    /// Deterministic identity used to recognise the movement on later syncs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_id: Option<ImportId>
}

impl TransactionRecord {
    pub fn new(date: NaiveDate, amount: Milliunits, cleared: ClearedStatus) -> Self {
        Self {
            account_id: None,
            date,
            amount,
            payee_name: None,
            memo: None,
            cleared,
            import_id: None
        }
    }

    pub fn with_import_id(mut self, import_id: impl Into<ImportId>) -> Self {
        self.import_id = Some(import_id.into());
        self
    }

    pub fn with_account(mut self, account_id: impl Into<LedgerAccountId>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_payee(mut self, payee_name: impl Into<String>) -> Self {
        self.payee_name = Some(payee_name.into());
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Appends the duplicate marker for `import_id` to the memo, after any existing text.
    pub fn with_duplicate_marker(mut self, import_id: &str) -> Self {
        let marker = duplicate_marker(import_id);

        self.memo = Some(match self.memo.take().filter(|memo| !memo.is_empty()) {
            Some(memo) => format!("{memo} {marker}"),
            None => marker
        });

        self
    }

    /// Whether the ledger already holds exactly what the bank reports.
    ///
    /// Only the fields a sync writes are compared; identity and bookkeeping fields are not.
    pub fn matches(&self, ledger: &LedgerTransaction) -> bool {
        self.date == ledger.date
            && self.amount == ledger.amount
            && self.memo == ledger.memo
            && self.cleared == ledger.cleared
            && self.payee_name == ledger.payee_name
    }
}

/// A transaction as stored by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// Ledger-assigned identity.
    pub id: String,
    pub account_id: LedgerAccountId,
    pub date: NaiveDate,
    pub amount: Milliunits,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    pub cleared: ClearedStatus,
    #[serde(default)]
    pub import_id: Option<ImportId>,
    #[serde(default)]
    pub deleted: bool
}

impl LedgerTransaction {
    /// Whether a previous sync folded the bank transaction `import_id` into this one.
    pub fn has_duplicate_marker(&self, import_id: &str) -> bool {
        self.memo.as_deref()
            .is_some_and(|memo| memo.contains(&duplicate_marker(import_id)))
    }
}

/// A change to an existing ledger transaction.
///
/// Without an `id` the ledger locates the transaction through the record's `import_id`.
/// With an `id` the record carries no `import_id`, so the ledger keeps the one it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub record: TransactionRecord
}

impl TransactionUpdate {
    pub fn by_import_id(record: TransactionRecord) -> Self {
        Self { id: None, record }
    }

    pub fn by_id(id: impl Into<String>, mut record: TransactionRecord) -> Self {
        record.import_id = None;
        Self { id: Some(id.into()), record }
    }
}
