use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, Local, NaiveDate};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

use crate::config::AccountConfig;
use crate::engine::Reconciler;
use crate::ledger::LedgerClient;
use crate::models::TransactionRecord;
use crate::providers::ProviderRegistry;
use crate::sync::SyncError;

/// Totals for one sync cycle across all configured accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub synchronized: usize,
    pub failed: usize,
    pub created: usize,
    pub updated: usize
}

#[derive(Debug, Default)]
struct AccountOutcome {
    created: usize,
    updated: usize
}

/// Synchronizes every configured bank account into its paired ledger account.
///
/// Accounts are processed one after another. A failure in one account is logged and
/// the cycle moves on to the next.
pub struct SyncService {
    accounts: Vec<AccountConfig>,
    providers: ProviderRegistry,
    ledger: Arc<dyn LedgerClient>,
    lookback_days: u32
}

impl SyncService {
    pub fn new(accounts: Vec<AccountConfig>, providers: ProviderRegistry, ledger: Arc<dyn LedgerClient>) -> Self {
        Self {
            accounts,
            providers,
            ledger,
            lookback_days: 7
        }
    }

    /// How many days before today each cycle looks at.
    pub fn with_lookback_days(mut self, lookback_days: u32) -> Self {
        self.lookback_days = lookback_days;
        self
    }

    /// Runs a cycle now and then once per `period`, forever.
    ///
    /// A cycle always finishes before the next one starts; ticks missed while a slow
    /// cycle was running are dropped rather than replayed.
    pub async fn run_on_schedule(&self, period: Duration) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.sync().await;
        }
    }

    /// Runs one cycle over the lookback window ending today.
    pub async fn sync(&self) -> SyncSummary {
        let today = Local::now().date_naive();
        let since = today.checked_sub_days(Days::new(self.lookback_days.into()))
            .unwrap_or(NaiveDate::MIN);

        self.sync_since(since).await
    }

    /// Runs one cycle over the transactions dated on or after `since`.
    pub async fn sync_since(&self, since: NaiveDate) -> SyncSummary {
        info!("Synchronizing accounts...");

        let mut summary = SyncSummary::default();

        for account in &self.accounts {
            match self.sync_account(account, since).await {
                Ok(outcome) => {
                    summary.synchronized += 1;
                    summary.created += outcome.created;
                    summary.updated += outcome.updated;
                }
                Err(error) => {
                    summary.failed += 1;
                    error!("Failed to sync account no. {}: {error}", account.source_account_number);
                }
            }
        }

        info!(
            "Synchronized {} of {} accounts ({} failed, {} created, {} updated).",
            summary.synchronized,
            self.accounts.len(),
            summary.failed,
            summary.created,
            summary.updated
        );

        summary
    }

    async fn sync_account(&self, account: &AccountConfig, since: NaiveDate) -> Result<AccountOutcome, SyncError> {
        let provider = self.providers.get(&account.provider)
            .ok_or_else(|| SyncError::UnknownProvider { slug: account.provider.clone() })?;

        info!("Synchronizing transactions for account no. {} (provider {})...", account.source_account_number, provider.slug());
        debug!("Fetching bank transactions...");

        let bank: Vec<TransactionRecord> = provider.fetch_transactions(&account.source_account_number, since, None).await?
            .into_iter()
            .map(|record| record.with_account(account.target_account_id.as_str()))
            .collect();

        trace!("{bank:?}");
        debug!(
            "Provider {} (account no. {}) returned {} transactions.",
            provider.slug(),
            account.source_account_number,
            bank.len()
        );
        //NOTE: Matched transactions take the placeholder's date, which can predate the bank window by up to one lookback
        let ledger_since = since.checked_sub_days(Days::new(self.lookback_days.into()))
            .unwrap_or(NaiveDate::MIN);

        debug!("Fetching ledger transactions for account ID {} since {ledger_since}...", account.target_account_id);

        let ledger = self.ledger.list_transactions_since(&account.budget_id, &account.target_account_id, ledger_since).await?;

        debug!("Fetched {} transactions for account ID {}.", ledger.len(), account.target_account_id);

        let reconciliation = Reconciler::new()
            .with_uncleared_matching(account.match_new_transactions_with_uncleared)
            .with_uncleared_since(since)
            .reconcile(&bank, &ledger)?;

        if reconciliation.is_empty() {
            debug!("Account ID {} is up to date.", account.target_account_id);
            return Ok(AccountOutcome::default());
        }

        debug!("Found {} new transactions, {} to update.", reconciliation.to_create.len(), reconciliation.to_update.len());

        let mut outcome = AccountOutcome::default();

        //NOTE: A failed creation ends the account here, its updates wait for the next cycle
        if !reconciliation.to_create.is_empty() {
            let response = self.ledger.create_transactions(&account.budget_id, &reconciliation.to_create).await
                .inspect_err(|error| error!("Creating transactions for account ID {} failed: {error}", account.target_account_id))?;

            if !response.duplicate_import_ids.is_empty() {
                warn!("Ledger skipped already imported transactions: {:?}", response.duplicate_import_ids);
            }

            info!("Created {} new transactions.", response.created.len());
            outcome.created = response.created.len();
        }

        if !reconciliation.to_update.is_empty() {
            let response = self.ledger.update_transactions(&account.budget_id, &reconciliation.to_update).await?;

            info!("Updated {} transactions.", response.updated.len());
            outcome.updated = response.updated.len();
        }

        Ok(outcome)
    }
}
