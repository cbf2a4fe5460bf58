use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{ClearedStatus, InvalidRecordError, LedgerTransaction, TransactionRecord, TransactionUpdate};

/// The ledger writes needed to bring one account in line with the bank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Bank transactions the ledger has never seen, in bank order.
    pub to_create: Vec<TransactionRecord>,
    /// Exact-match updates first, then uncleared-match updates.
    pub to_update: Vec<TransactionUpdate>
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty()
    }
}

/// Diffs bank transactions against the ledger's view of the same account.
///
/// Reconciliation is pure: it never talks to the bank or the ledger, it only decides
/// which writes are needed. Running it again with a ledger that already reflects
/// those writes yields an empty [`Reconciliation`].
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    match_uncleared: bool,
    uncleared_since: Option<NaiveDate>
}

impl Reconciler {
    pub fn new() -> Self {
        Self {
            match_uncleared: false,
            uncleared_since: None
        }
    }

    /// Folds newly cleared bank transactions into manually entered uncleared ledger
    /// transactions of the same amount instead of creating them.
    pub fn with_uncleared_matching(mut self, enabled: bool) -> Self {
        self.match_uncleared = enabled;
        self
    }

    /// Only uncleared ledger transactions dated on or after `since` may be matched.
    pub fn with_uncleared_since(mut self, since: NaiveDate) -> Self {
        self.uncleared_since = Some(since);
        self
    }

    /// Computes the creates and updates for `bank` against `ledger`.
    ///
    /// # Errors
    /// Returns `InvalidRecordError` if a bank record:
    /// - Has no import id.
    /// - Has no target account.
    /// - Targets a different account than the rest of the batch.
    pub fn reconcile(&self, bank: &[TransactionRecord], ledger: &[LedgerTransaction]) -> Result<Reconciliation, InvalidRecordError> {
        let Some(account_id) = validate(bank)? else {
            return Ok(Reconciliation::default())
        };

        let mut by_import_id = HashMap::<&str, &LedgerTransaction>::new();

        for transaction in ledger {
            if let Some(import_id) = transaction.import_id.as_deref() {
                by_import_id.entry(import_id).or_insert(transaction);
            }
        }

        let mut reconciliation = Reconciliation::default();
        let mut claimed = HashSet::<&str>::new();

        for record in bank {
            let import_id = record.import_id.as_deref().unwrap_or_default();

            match by_import_id.get(import_id).copied() {
                Some(existing) => {
                    claimed.insert(existing.id.as_str());

                    if existing.deleted {
                        debug!("Transaction [{import_id}] was deleted from the ledger, leaving it alone");
                    } else if !record.matches(existing) {
                        reconciliation.to_update.push(TransactionUpdate::by_import_id(record.clone()));
                    }
                }
                None => reconciliation.to_create.push(record.clone())
            }
        }

        //NOTE: Stamped records are dropped before matching so they cannot claim another uncleared transaction
        reconciliation.to_create.retain(|record| {
            let import_id = record.import_id.as_deref().unwrap_or_default();
            let already_applied = ledger.iter().any(|transaction| transaction.has_duplicate_marker(import_id));

            if already_applied {
                debug!("Transaction [{import_id}] was already matched to an uncleared transaction, skipping");
            }

            !already_applied
        });

        if self.match_uncleared && !reconciliation.to_create.is_empty() {
            let candidates = std::mem::take(&mut reconciliation.to_create);
            let (remaining, matched) = match_uncleared(candidates, account_id, self.uncleared_since, ledger, &claimed);

            reconciliation.to_create = remaining;
            reconciliation.to_update.extend(matched);
        }

        Ok(reconciliation)
    }
}

/// Checks every record carries its identity and returns the account they all target,
/// or `None` for an empty batch.
fn validate(bank: &[TransactionRecord]) -> Result<Option<&str>, InvalidRecordError> {
    let mut expected_account: Option<&str> = None;

    for record in bank {
        if record.import_id.as_deref().is_none_or(str::is_empty) {
            return Err(InvalidRecordError::missing_import_id(record));
        }

        let Some(account_id) = record.account_id.as_deref() else {
            return Err(InvalidRecordError::missing_account(record))
        };

        match expected_account {
            Some(expected) if expected != account_id => {
                return Err(InvalidRecordError::account_mismatch(expected, record))
            }
            Some(_) => {}
            None => expected_account = Some(account_id)
        }
    }

    Ok(expected_account)
}

/// Splits creation candidates into those still to create and updates that fold
/// cleared candidates into uncleared ledger transactions.
///
/// Each uncleared ledger transaction is consumed by at most one candidate; the first
/// one with the same amount wins.
fn match_uncleared(candidates: Vec<TransactionRecord>, account_id: &str, since: Option<NaiveDate>, ledger: &[LedgerTransaction], claimed: &HashSet<&str>) -> (Vec<TransactionRecord>, Vec<TransactionUpdate>) {
    let mut pool: Vec<&LedgerTransaction> = ledger.iter()
        .filter(|transaction| {
            !transaction.deleted
                && transaction.account_id == account_id
                && since.is_none_or(|since| transaction.date >= since)
                && transaction.cleared == ClearedStatus::Uncleared
                && !claimed.contains(transaction.id.as_str())
        })
        .collect();

    let mut remaining = Vec::with_capacity(candidates.len());
    let mut matched = Vec::new();

    for candidate in candidates {
        if candidate.cleared != ClearedStatus::Cleared {
            remaining.push(candidate);
            continue;
        }

        let Some(position) = pool.iter().position(|transaction| transaction.amount == candidate.amount) else {
            remaining.push(candidate);
            continue;
        };

        let uncleared = pool.remove(position);
        let import_id = candidate.import_id.clone().unwrap_or_default();

        debug!("Matched new transaction [{import_id}] to uncleared transaction [{}]", uncleared.id);

        let mut record = candidate.with_duplicate_marker(&import_id);
        record.date = uncleared.date;

        matched.push(TransactionUpdate::by_id(uncleared.id.clone(), record));
    }

    (remaining, matched)
}
