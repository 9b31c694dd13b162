use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::models::TransactionRecord;
use crate::types::{AccountId, Flow};

/// Everything one sender paid one receiver inside a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedEdge {
    pub sender: AccountId,
    pub receiver: AccountId,
    pub flow: Flow
}

/// First day of the window ending on `reference_date`.
pub fn window_start(reference_date: NaiveDate, window_days: u32) -> NaiveDate {
    reference_date.checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Collapses the transactions dated within `[reference_date - window_days, reference_date]`
/// into one edge per ordered (sender, receiver) pair.
///
/// Edges come out sorted by sender then receiver, so the result does not depend on
/// the order of `transactions`.
pub fn aggregate_window(transactions: &[TransactionRecord], reference_date: NaiveDate, window_days: u32) -> Vec<AggregatedEdge> {
    let start = window_start(reference_date, window_days);
    let mut pairs: BTreeMap<(&str, &str), Flow> = BTreeMap::new();

    for transaction in transactions {
        if transaction.date < start || transaction.date > reference_date {
            continue;
        }

        *pairs.entry((transaction.sender.as_str(), transaction.receiver.as_str())).or_default()
            += Flow::single(transaction.amount);
    }

    pairs.into_iter()
        .map(|((sender, receiver), flow)| AggregatedEdge {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            flow
        })
        .collect()
}
