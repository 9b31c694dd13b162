mod row_storage;

use chrono::NaiveDate;

use crate::models::FeatureRow;
use crate::types::AccountId;

pub use row_storage::RowStorage;

/// Rows produced for one alerted account on one alert date.
pub type RowKey = (NaiveDate, AccountId);

pub trait FeatureStorage: Send + Sync + 'static {
    /// Removes and returns the rows stored under `key`.
    fn load(&self, key: &RowKey) -> Option<Vec<FeatureRow>>;
    fn save(&self, key: RowKey, rows: Vec<FeatureRow>);
    /// Removes and returns every stored row, in no particular order.
    fn drain(&self) -> Vec<FeatureRow>;
}
