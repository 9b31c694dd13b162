mod features;
mod result;
#[cfg(test)]
mod tests;
mod transaction;

pub use features::{FeatureRow, NeighborFeatures, SourceFeatures};
pub use result::{ResultTable, SkippedAccount};
pub use transaction::{group_alerts_by_date, AlertRecord, TransactionRecord};
