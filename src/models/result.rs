use chrono::NaiveDate;

use crate::models::FeatureRow;
use crate::types::AccountId;

/// An alerted account whose processing failed and was left out of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAccount {
    pub alert_date: NaiveDate,
    pub account_id: AccountId,
    pub reason: String
}

/// Output of a full run. Rows are sorted by alert date, source account, hop
/// distance and neighbor account.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    pub rows: Vec<FeatureRow>,
    pub skipped: Vec<SkippedAccount>,
    /// Rows whose indirect amount or count came out negative.
    pub data_quality_warnings: usize
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
