use crate::config::NeighborhoodSettings;
use crate::features::annotate_popularity;
use crate::models::{group_alerts_by_date, ResultTable};
use crate::sources::{AlertProvider, TransactionProvider};
use crate::storage::{FeatureStorage, RowStorage};
use crate::workers::DateWorker;
use std::sync::Arc;
use tokio::task::{spawn_blocking, JoinSet};
use tracing::{debug, error, info, warn};

/// Batch pipeline turning transactions and alerts into the neighborhood feature table.
pub struct FeatureEngine {
    storage: Arc<RowStorage>,
    settings: NeighborhoodSettings
}

impl FeatureEngine {
    /// Creates a new engine instance with the provided storage.
    pub fn new(storage: Arc<RowStorage>, settings: NeighborhoodSettings) -> Self {
        Self {
            storage,
            settings
        }
    }

    /// Loads both providers, processes every alert date on its own blocking task and
    /// assembles the annotated result table.
    ///
    /// # Errors
    /// Fails only when a provider cannot be read. Failures of single accounts or
    /// single dates are logged and leave the rest of the table intact.
    pub async fn run<T: TransactionProvider, A: AlertProvider>(&self, transactions: Arc<T>, alerts: Arc<A>) -> anyhow::Result<ResultTable> {
        let transactions = spawn_blocking(move || transactions.transactions());
        let alerts = spawn_blocking(move || alerts.alerts());

        let transactions = Arc::new(transactions.await??);
        let alerts = group_alerts_by_date(&alerts.await??);

        if !self.storage.is_empty() {
            warn!("Discarding rows of [{}] alert accounts left in storage by an earlier run", self.storage.len());
            self.storage.drain();
        }

        info!("Processing [{}] alert dates over [{}] transactions", alerts.len(), transactions.len());

        let mut tasks = JoinSet::new();

        for (alert_date, accounts) in alerts {
            DateWorker::new(alert_date, accounts, transactions.clone(), self.settings, self.storage.clone())
                .spawn(&mut tasks);
        }

        let mut table = ResultTable::default();
        let mut processed = 0;
        let mut idle = 0;

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(report) => {
                    processed += report.processed;
                    idle += report.idle;
                    table.skipped.extend(report.skipped);
                }
                Err(error) => {
                    error!("An alert date worker did not finish gracefully: {error:?}");
                }
            }
        }

        debug!("Collecting rows of [{}] alert accounts", self.storage.len());

        let mut rows = self.storage.drain();
        rows.sort_by(|left, right| {
            left.alert_date.cmp(&right.alert_date)
                .then_with(|| left.source_account_id.cmp(&right.source_account_id))
                .then_with(|| left.hop_distance.cmp(&right.hop_distance))
                .then_with(|| left.account_id.cmp(&right.account_id))
        });

        table.rows = annotate_popularity(rows);
        table.data_quality_warnings = table.rows.iter().filter(|row| row.has_negative_indirect()).count();
        table.skipped.sort_by(|left, right| {
            left.alert_date.cmp(&right.alert_date).then_with(|| left.account_id.cmp(&right.account_id))
        });

        if table.data_quality_warnings > 0 {
            warn!("[{}] rows carry a negative indirect inflow", table.data_quality_warnings);
        }

        info!(
            "Produced [{}] rows from [{}] alert accounts, [{}] without outflow, [{}] failed",
            table.len(), processed, idle, table.skipped.len()
        );

        Ok(table)
    }
}
