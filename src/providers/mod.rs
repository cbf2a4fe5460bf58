mod csv_export;
mod errors;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;

use crate::models::TransactionRecord;
use crate::types::{ImportId, Milliunits};

pub use csv_export::CsvExportProvider;
pub use errors::ProviderError;

/// Free-form settings block for one provider, keyed by setting name.
pub type ProviderSettings = HashMap<String, String>;

/// A source of bank transactions for one institution.
#[async_trait]
pub trait BankProvider: Send + Sync {
    /// Unique name the configuration refers to this provider by.
    fn slug(&self) -> &str;

    /// Fetches the account's transactions between `start_date` and `end_date` (today when absent).
    ///
    /// Records come back with their import id, date, signed amount and cleared state
    /// filled in, but without a target account.
    async fn fetch_transactions(&self, account_number: &str, start_date: NaiveDate, end_date: Option<NaiveDate>) -> Result<Vec<TransactionRecord>, ProviderError>;
}

/// Providers available to the sync, looked up by slug.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn BankProvider>>
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new()
        }
    }

    /// Builds every provider that has a settings block.
    ///
    /// # Errors
    /// Returns `ProviderError` if a known provider's settings are incomplete.
    pub fn from_settings(settings: &HashMap<String, ProviderSettings>) -> Result<Self, ProviderError> {
        let mut registry = Self::new();

        for (slug, block) in settings {
            match slug.as_str() {
                csv_export::SLUG => registry.register(CsvExportProvider::from_settings(block)?),
                _ => warn!("No provider is available for settings block '{slug}', ignoring it")
            }
        }

        Ok(registry)
    }

    pub fn register<P: BankProvider + 'static>(&mut self, provider: P) {
        self.providers.insert(provider.slug().to_string(), Arc::new(provider));
    }

    pub fn get(&self, slug: &str) -> Option<Arc<dyn BankProvider>> {
        self.providers.get(slug).cloned()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Assigns import ids of the form `RS:<slug>:<milliunits>:<date>:<occurrence>`.
///
/// The occurrence counter separates transactions sharing an amount and a date, so records
/// must be fed in a stable order for the ids to survive from one sync to the next.
pub struct ImportIdGenerator {
    prefix: String,
    occurrences: HashMap<(Milliunits, NaiveDate), u32>
}

impl ImportIdGenerator {
    pub fn new(slug: &str) -> Self {
        Self {
            prefix: format!("RS:{slug}:"),
            occurrences: HashMap::new()
        }
    }

    pub fn next_id(&mut self, amount: Milliunits, date: NaiveDate) -> ImportId {
        let occurrence = self.occurrences.entry((amount, date)).or_insert(0);
        *occurrence += 1;

        format!("{}{}:{}:{}", self.prefix, amount.value(), date.format("%Y-%m-%d"), occurrence)
    }
}
