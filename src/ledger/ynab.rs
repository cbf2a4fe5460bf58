use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ledger::{CreatedTransactions, LedgerApiError, LedgerClient, UpdatedTransactions};
use crate::models::{LedgerTransaction, TransactionRecord, TransactionUpdate};

pub const DEFAULT_API_URL: &str = "https://api.youneedabudget.com/v1";

/// HTTP client for the YNAB budgeting API.
pub struct YnabClient {
    client: Client,
    api_url: String,
    token: String
}

#[derive(Deserialize)]
pub(super) struct Envelope<T> {
    pub(super) data: T
}

#[derive(Deserialize)]
pub(super) struct TransactionsData {
    pub(super) transactions: Vec<LedgerTransaction>,
    #[serde(default)]
    pub(super) duplicate_import_ids: Vec<String>
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail
}

#[derive(Deserialize)]
struct ErrorDetail {
    name: String,
    #[serde(default)]
    detail: String
}

#[derive(Serialize)]
struct TransactionsBody<'a, T> {
    transactions: &'a [T]
}

impl YnabClient {
    /// Creates a client authenticating with the personal access `token`.
    ///
    /// Every request is bounded by `timeout`.
    pub fn new(token: impl Into<String>, api_url: impl Into<String>, timeout: Duration) -> Result<Self, LedgerApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into()
        })
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, LedgerApiError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let envelope: Envelope<T> = response.json().await?;

        Ok(envelope.data)
    }
}

#[async_trait]
impl LedgerClient for YnabClient {
    async fn list_transactions_since(&self, budget_id: &str, account_id: &str, since: NaiveDate) -> Result<Vec<LedgerTransaction>, LedgerApiError> {
        let url = self.url(&format!("/budgets/{budget_id}/accounts/{account_id}/transactions"));
        let request = self.client.get(url)
            .query(&[("since_date", since.format("%Y-%m-%d").to_string())]);

        let data: TransactionsData = self.send(request).await?;

        debug!("Ledger returned {} transactions for account [{account_id}] since {since}", data.transactions.len());
        trace!("{:?}", data.transactions);

        Ok(data.transactions)
    }

    async fn create_transactions(&self, budget_id: &str, records: &[TransactionRecord]) -> Result<CreatedTransactions, LedgerApiError> {
        let url = self.url(&format!("/budgets/{budget_id}/transactions"));
        let request = self.client.post(url).json(&TransactionsBody { transactions: records });

        let data: TransactionsData = self.send(request).await?;

        Ok(CreatedTransactions {
            created: data.transactions,
            duplicate_import_ids: data.duplicate_import_ids
        })
    }

    async fn update_transactions(&self, budget_id: &str, records: &[TransactionUpdate]) -> Result<UpdatedTransactions, LedgerApiError> {
        let url = self.url(&format!("/budgets/{budget_id}/transactions"));
        let request = self.client.patch(url).json(&TransactionsBody { transactions: records });

        let data: TransactionsData = self.send(request).await?;

        Ok(UpdatedTransactions {
            updated: data.transactions
        })
    }
}

/// Maps a failed response body onto `LedgerApiError::Api`, keeping the raw body
/// when it is not the API's error envelope.
pub(super) fn api_error(status: u16, body: &str) -> LedgerApiError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => LedgerApiError::Api {
            status,
            name: envelope.error.name,
            detail: envelope.error.detail
        },
        Err(_) => LedgerApiError::Api {
            status,
            name: "unexpected_response".to_string(),
            detail: body.trim().to_string()
        }
    }
}
