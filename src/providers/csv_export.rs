use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tokio::task::spawn_blocking;
use tracing::{debug, trace};

use crate::models::{ClearedStatus, TransactionRecord};
use crate::providers::{BankProvider, ImportIdGenerator, ProviderError, ProviderSettings};
use crate::types::Milliunits;

pub const SLUG: &str = "csv";

const DIRECTORY_SETTING: &str = "directory";
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// Reads transactions from statement exports dropped into a directory.
///
/// Each account has one file, `<account number>.csv`, where the account number is
/// stripped of everything but letters and digits. The file carries the columns
/// `date,amount,payee,memo,status`.
pub struct CsvExportProvider {
    directory: PathBuf
}

/// A single row from an exported statement, before it is checked.
#[derive(Debug, Deserialize)]
struct ExportRow {
    date: String,
    amount: String,
    payee: Option<String>,
    memo: Option<String>,
    status: String
}

#[derive(Debug, Clone)]
struct ExportedTransaction {
    date: NaiveDate,
    amount: Milliunits,
    payee: Option<String>,
    memo: Option<String>,
    cleared: ClearedStatus
}

impl CsvExportProvider {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into()
        }
    }

    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let directory = settings.get(DIRECTORY_SETTING)
            .filter(|directory| !directory.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingSetting {
                slug: SLUG.to_string(),
                key: DIRECTORY_SETTING.to_string()
            })?;

        Ok(Self::new(directory))
    }

    fn export_path(&self, account_number: &str) -> PathBuf {
        self.directory.join(format!("{}.csv", sanitize_account_number(account_number)))
    }
}

#[async_trait]
impl BankProvider for CsvExportProvider {
    fn slug(&self) -> &str {
        SLUG
    }

    async fn fetch_transactions(&self, account_number: &str, start_date: NaiveDate, end_date: Option<NaiveDate>) -> Result<Vec<TransactionRecord>, ProviderError> {
        let path = self.export_path(account_number);
        let end_date = end_date.unwrap_or_else(|| Local::now().date_naive());

        debug!("Reading export {} for {start_date} to {end_date}...", path.display());

        let mut exported = spawn_blocking(move || read_export(&path)).await??;

        exported.retain(|transaction| transaction.date >= start_date && transaction.date <= end_date);
        exported.sort_by_key(|transaction| transaction.date);

        let mut import_ids = ImportIdGenerator::new(SLUG);
        let records: Vec<TransactionRecord> = exported.into_iter()
            .map(|transaction| to_record(transaction, &mut import_ids))
            .collect();

        trace!("{records:?}");

        Ok(records)
    }
}

fn read_export(path: &Path) -> Result<Vec<ExportedTransaction>, ProviderError> {
    let file = File::open(path).map_err(|source| ProviderError::Io {
        path: path.to_path_buf(),
        source
    })?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(BufReader::new(file));

    let mut exported = Vec::new();

    // NOTE: Line numbers are 1-based and the header occupies line 1.
    for (index, result) in reader.deserialize::<ExportRow>().enumerate() {
        exported.push(result?.parse(index + 2)?);
    }

    Ok(exported)
}

impl ExportRow {
    fn parse(self, line: usize) -> Result<ExportedTransaction, ProviderError> {
        let malformed = |reason: String| ProviderError::MalformedRow { line, reason };

        let date = DATE_FORMATS.iter()
            .find_map(|format| NaiveDate::parse_from_str(&self.date, format).ok())
            .ok_or_else(|| malformed(format!("unrecognised date '{}'", self.date)))?;

        let amount = Milliunits::from_str(&self.amount)
            .map_err(|error| malformed(error.to_string()))?;

        let cleared = match self.status.to_lowercase().as_str() {
            "executed" | "cleared" => ClearedStatus::Cleared,
            "pending" | "uncleared" => ClearedStatus::Uncleared,
            other => return Err(malformed(format!("unknown status '{other}'")))
        };

        Ok(ExportedTransaction {
            date,
            amount,
            payee: self.payee.filter(|payee| !payee.is_empty()),
            memo: self.memo.filter(|memo| !memo.is_empty()),
            cleared
        })
    }
}

fn to_record(transaction: ExportedTransaction, import_ids: &mut ImportIdGenerator) -> TransactionRecord {
    let import_id = import_ids.next_id(transaction.amount, transaction.date);
    let mut record = TransactionRecord::new(transaction.date, transaction.amount, transaction.cleared)
        .with_import_id(import_id);

    //NOTE: Statements repeat the counterparty as the purpose when nothing else was entered
    if let Some(memo) = transaction.memo.filter(|memo| Some(memo) != transaction.payee.as_ref()) {
        record = record.with_memo(memo);
    }

    if let Some(payee) = transaction.payee.filter(|_| transaction.amount.is_negative()) {
        record = record.with_payee(payee);
    }

    record
}

fn sanitize_account_number(account_number: &str) -> String {
    account_number.chars().filter(char::is_ascii_alphanumeric).collect()
}
