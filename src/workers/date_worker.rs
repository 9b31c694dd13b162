use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::config::NeighborhoodSettings;
use crate::features::compose_rows;
use crate::graph::{aggregate_window, extract_ego, hop_distances, window_start, FlowGraph, GraphError};
use crate::models::{FeatureRow, SkippedAccount, TransactionRecord};
use crate::storage::FeatureStorage;
use crate::types::AccountId;

/// What one alert date contributed to the run.
#[derive(Debug, Clone, Default)]
pub struct DateReport {
    pub processed: usize,
    pub idle: usize,
    pub skipped: Vec<SkippedAccount>
}

/// Processes every account alerted on one date against that date's window graph.
pub struct DateWorker<S: FeatureStorage> {
    alert_date: NaiveDate,
    accounts: Vec<AccountId>,
    transactions: Arc<Vec<TransactionRecord>>,
    settings: NeighborhoodSettings,
    storage: Arc<S>
}

impl<S: FeatureStorage> DateWorker<S> {
    pub fn new(alert_date: NaiveDate, accounts: Vec<AccountId>, transactions: Arc<Vec<TransactionRecord>>, settings: NeighborhoodSettings, storage: Arc<S>) -> Self {
        Self {
            alert_date,
            accounts,
            transactions,
            settings,
            storage
        }
    }

    /// Spawns the worker on the blocking pool of `tasks`.
    pub fn spawn(self, tasks: &mut JoinSet<DateReport>) {
        tasks.spawn_blocking(move || self.process());
    }

    /// Builds the date's graph once, then extracts features for every alerted account
    /// with outgoing flow in the window. A failing or panicking account is recorded
    /// and skipped, the rest of the date carries on.
    pub fn process(self) -> DateReport {
        let edges = aggregate_window(&self.transactions, self.alert_date, self.settings.txn_days);
        let graph = FlowGraph::build(&edges);

        info!(
            "Window [{}..={}]: [{}] accounts, [{}] edges, [{}] alerted",
            window_start(self.alert_date, self.settings.txn_days), self.alert_date,
            graph.node_count(), graph.edge_count(), self.accounts.len()
        );

        let mut report = DateReport::default();

        for account_id in &self.accounts {
            //NOTE: Without outgoing flow there is no neighborhood to describe
            if graph.out_degree(account_id) == 0 {
                debug!("Alert account [{account_id}] has no outflow in the window ending [{}], skipping", self.alert_date);
                report.idle += 1;
                continue;
            }

            match isolated(|| self.process_account(&graph, account_id)) {
                Ok(rows) => {
                    debug!("Alert account [{account_id}] on [{}] produced [{}] rows", self.alert_date, rows.len());
                    self.storage.save((self.alert_date, account_id.clone()), rows);
                    report.processed += 1;
                }
                Err(reason) => {
                    error!("Alert account [{account_id}] on [{}] failed: {reason}", self.alert_date);
                    report.skipped.push(SkippedAccount {
                        alert_date: self.alert_date,
                        account_id: account_id.clone(),
                        reason
                    });
                }
            }
        }

        report
    }

    fn process_account(&self, graph: &FlowGraph, account_id: &str) -> Result<Vec<FeatureRow>, GraphError> {
        let ego = extract_ego(graph, account_id, self.settings.radius, self.settings.reachability)?;
        let distances = hop_distances(&ego.graph, account_id, self.settings.reachability)?;

        Ok(compose_rows(graph, &ego, &distances, self.alert_date))
    }
}

/// Runs one account's extraction, turning both an error and a panic into a skip reason.
pub fn isolated<T>(work: impl FnOnce() -> Result<T, GraphError>) -> Result<T, String> {
    match catch_unwind(AssertUnwindSafe(work)) {
        Ok(result) => result.map_err(|error| error.to_string()),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref())))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}
