use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::AccountId;

/// One raw money transfer as supplied by the transaction provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub sender: AccountId,
    pub receiver: AccountId,
    /// Never negative; the CSV source rejects negative rows.
    pub amount: Decimal
}

impl TransactionRecord {
    pub fn new(date: NaiveDate, sender: &str, receiver: &str, amount: Decimal) -> Self {
        Self {
            date,
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount
        }
    }
}

/// An account flagged by the monitoring process on a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRecord {
    pub account_id: AccountId,
    pub alert_date: NaiveDate,
    pub flag: Option<String>
}

impl AlertRecord {
    pub fn new(account_id: &str, alert_date: NaiveDate) -> Self {
        Self {
            account_id: account_id.to_string(),
            alert_date,
            flag: None
        }
    }

    pub fn with_flag(mut self, flag: Option<&str>) -> Self {
        self.flag = flag.map(str::to_string);
        self
    }
}

/// Groups alerts by date. Dates come out ascending and every account list is
/// sorted and free of duplicates.
pub fn group_alerts_by_date(alerts: &[AlertRecord]) -> BTreeMap<NaiveDate, Vec<AccountId>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<AccountId>> = BTreeMap::new();

    for alert in alerts {
        grouped.entry(alert.alert_date).or_default().push(alert.account_id.clone());
    }

    for accounts in grouped.values_mut() {
        accounts.sort();
        accounts.dedup();
    }

    grouped
}
