use crate::models::TransactionRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvalidRecordError {
    #[error("Transaction [{}]:[{}] has no import id: {record:?}", .record.date, .record.amount)]
    MissingImportId {
        record: Box<TransactionRecord>
    },
    #[error("Transaction [{}] has no target account: {record:?}", .record.import_id.as_deref().unwrap_or_default())]
    MissingAccount {
        record: Box<TransactionRecord>
    },
    #[error("Transaction [{}] targets account [{}] instead of [{expected}]: {record:?}", .record.import_id.as_deref().unwrap_or_default(), .record.account_id.as_deref().unwrap_or_default())]
    AccountMismatch {
        expected: String,
        record: Box<TransactionRecord>
    }
}

impl InvalidRecordError {
    pub fn missing_import_id(record: &TransactionRecord) -> Self {
        Self::MissingImportId { record: Box::new(record.clone()) }
    }

    pub fn missing_account(record: &TransactionRecord) -> Self {
        Self::MissingAccount { record: Box::new(record.clone()) }
    }

    pub fn account_mismatch(expected: &str, record: &TransactionRecord) -> Self {
        Self::AccountMismatch {
            expected: expected.to_string(),
            record: Box::new(record.clone())
        }
    }
}
