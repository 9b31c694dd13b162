mod csv_source;
mod errors;

use crate::models::{AlertRecord, TransactionRecord};

pub use csv_source::{CsvAlertSource, CsvTransactionSource};
pub use errors::SourceError;

/// Supplies every raw transaction in one batch.
pub trait TransactionProvider: Send + Sync + 'static {
    fn transactions(&self) -> Result<Vec<TransactionRecord>, SourceError>;
}

/// Supplies every alert notation in one batch.
pub trait AlertProvider: Send + Sync + 'static {
    fn alerts(&self) -> Result<Vec<AlertRecord>, SourceError>;
}

impl TransactionProvider for Vec<TransactionRecord> {
    fn transactions(&self) -> Result<Vec<TransactionRecord>, SourceError> {
        Ok(self.clone())
    }
}

impl AlertProvider for Vec<AlertRecord> {
    fn alerts(&self) -> Result<Vec<AlertRecord>, SourceError> {
        Ok(self.clone())
    }
}
