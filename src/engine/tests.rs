use super::FeatureEngine;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::config::{ColumnBindings, NeighborhoodSettings};
use crate::graph::Reachability;
use crate::models::{AlertRecord, TransactionRecord};
use crate::sources::{CsvAlertSource, CsvTransactionSource, SourceError, TransactionProvider};
use crate::storage::RowStorage;
use crate::workers::DateWorker;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

fn txn(day: u32, sender: &str, receiver: &str, amount: i64) -> TransactionRecord {
    TransactionRecord::new(date(day), sender, receiver, Decimal::from(amount))
}

fn sample_transactions() -> Vec<TransactionRecord> {
    vec![
        txn(1, "A", "B", 100),
        txn(1, "B", "C", 50),
        txn(3, "A", "B", 200),
        txn(3, "E", "B", 30),
        txn(4, "E", "C", 70),
        txn(5, "C", "A", 10),
    ]
}

struct FailingProvider;

impl TransactionProvider for FailingProvider {
    fn transactions(&self) -> Result<Vec<TransactionRecord>, SourceError> {
        Err(SourceError::MissingColumn { column: "SYSTEM_DATE".to_string(), path: "warehouse".to_string() })
    }
}

#[tokio::test]
async fn test_engine_reproduces_reference_scenario() -> Result<()> {
    let transactions = Arc::new(vec![txn(1, "A", "B", 100), txn(1, "B", "C", 50), txn(3, "A", "B", 200)]);
    let alerts = Arc::new(vec![AlertRecord::new("A", date(3))]);

    let engine = FeatureEngine::new(Arc::new(RowStorage::new()), NeighborhoodSettings::new(2, 1));
    let table = engine.run(transactions, alerts).await?;

    assert_eq!(table.len(), 1);

    let row = &table.rows[0];

    assert_eq!(row.account_id, "B");
    assert_eq!(row.hop_distance, 1);
    assert_eq!(row.direct_inbound_amount, Decimal::from(300));
    assert_eq!(row.total_inbound_amount, Decimal::from(300));
    assert_eq!(row.indirect_inbound_amount, Decimal::ZERO);
    assert_eq!(row.popularity, 1);
    assert_eq!(row.alert_date, date(3));
    assert_eq!(table.data_quality_warnings, 0);

    Ok(())
}

#[tokio::test]
async fn test_engine_excludes_alerted_accounts_without_outflow() -> Result<()> {
    // "C" only receives before day 3 and "Z" never transacts
    let alerts = Arc::new(vec![
        AlertRecord::new("A", date(3)),
        AlertRecord::new("C", date(3)),
        AlertRecord::new("Z", date(3)),
    ]);

    let engine = FeatureEngine::new(Arc::new(RowStorage::new()), NeighborhoodSettings::new(2, 2));
    let table = engine.run(Arc::new(sample_transactions()), alerts).await?;

    assert!(!table.is_empty());
    assert!(table.rows.iter().all(|row| row.source_account_id == "A"));
    assert!(table.skipped.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_engine_builds_one_window_per_alert_date() -> Result<()> {
    let alerts = Arc::new(vec![
        AlertRecord::new("A", date(1)),
        AlertRecord::new("A", date(3)),
        AlertRecord::new("E", date(4)),
    ]);

    let engine = FeatureEngine::new(Arc::new(RowStorage::new()), NeighborhoodSettings::new(0, 1));
    let table = engine.run(Arc::new(sample_transactions()), alerts).await?;

    let summary: Vec<_> = table.rows.iter()
        .map(|row| (row.alert_date, row.source_account_id.as_str(), row.account_id.as_str(), row.direct_inbound_amount))
        .collect();

    assert_eq!(summary, vec![
        (date(1), "A", "B", Decimal::from(100)),
        (date(3), "A", "B", Decimal::from(200)),
        (date(4), "E", "C", Decimal::from(70)),
    ]);

    let neighbor_b = table.rows.iter().find(|row| row.account_id == "B").ok_or_else(|| anyhow!("B missing"))?;

    assert_eq!(neighbor_b.popularity, 2);

    Ok(())
}

#[tokio::test]
async fn test_engine_popularity_matches_row_occurrences() -> Result<()> {
    let alerts = Arc::new(vec![
        AlertRecord::new("A", date(5)),
        AlertRecord::new("E", date(5)),
        AlertRecord::new("B", date(5)),
    ]);

    let engine = FeatureEngine::new(
        Arc::new(RowStorage::new()),
        NeighborhoodSettings::new(5, 2).with_reachability(Reachability::Undirected)
    );
    let table = engine.run(Arc::new(sample_transactions()), alerts).await?;

    for row in &table.rows {
        let occurrences = table.rows.iter().filter(|other| other.account_id == row.account_id).count();
        assert_eq!(row.popularity, occurrences);
        assert!(row.hop_distance >= 1 && row.hop_distance <= 2);
        assert_ne!(row.account_id, row.source_account_id);
    }

    Ok(())
}

#[tokio::test]
async fn test_engine_runs_are_idempotent() -> Result<()> {
    let transactions = Arc::new(sample_transactions());
    let alerts = Arc::new(vec![
        AlertRecord::new("E", date(5)),
        AlertRecord::new("A", date(3)),
        AlertRecord::new("C", date(5)),
    ]);

    let engine = FeatureEngine::new(Arc::new(RowStorage::new()), NeighborhoodSettings::new(4, 3));
    let first = engine.run(transactions.clone(), alerts.clone()).await?;
    let second = engine.run(transactions, alerts).await?;

    assert_eq!(first.rows, second.rows);

    Ok(())
}

#[tokio::test]
async fn test_engine_with_no_alerts_returns_empty_table() -> Result<()> {
    let engine = FeatureEngine::new(Arc::new(RowStorage::new()), NeighborhoodSettings::new(4, 3));
    let table = engine.run(Arc::new(sample_transactions()), Arc::new(Vec::<AlertRecord>::new())).await?;

    assert!(table.is_empty());
    assert!(table.skipped.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_engine_propagates_provider_failure() {
    let engine = FeatureEngine::new(Arc::new(RowStorage::new()), NeighborhoodSettings::new(4, 3));
    let result = engine.run(Arc::new(FailingProvider), Arc::new(vec![AlertRecord::new("A", date(3))])).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_engine_reads_csv_providers() -> Result<()> {
    let mut transactions = NamedTempFile::new()?;
    writeln!(transactions, "SYSTEM_DATE,SENDER_ACCOUNT_ID,RECEIVER_ACCOUNT_ID,TXN_AMT_ABS")?;
    writeln!(transactions, "2024-01-01,A,B,100.00")?;
    writeln!(transactions, "2024-01-01,B,C,50.00")?;
    writeln!(transactions, "2024-01-03,A,B,200.00")?;
    writeln!(transactions, "2024-01-03,A,B,oops")?;

    let mut alerts = NamedTempFile::new()?;
    writeln!(alerts, "ACCOUNT_ID,CREATE_DATE,FLAG")?;
    writeln!(alerts, "A,2024-01-03,ALERT")?;

    let columns = ColumnBindings {
        date: "SYSTEM_DATE".to_string(),
        sender: "SENDER_ACCOUNT_ID".to_string(),
        receiver: "RECEIVER_ACCOUNT_ID".to_string(),
        amount: "TXN_AMT_ABS".to_string(),
        alert_account: "ACCOUNT_ID".to_string(),
        alert_date: "CREATE_DATE".to_string(),
        alert_flag: Some("FLAG".to_string())
    };

    let engine = FeatureEngine::new(Arc::new(RowStorage::new()), NeighborhoodSettings::new(2, 2));
    let table = engine.run(
        Arc::new(CsvTransactionSource::new(transactions.path(), columns.clone(), "%Y-%m-%d")),
        Arc::new(CsvAlertSource::new(alerts.path(), columns, "%Y-%m-%d"))
    ).await?;

    let accounts: Vec<_> = table.rows.iter().map(|row| (row.account_id.as_str(), row.hop_distance)).collect();

    assert_eq!(accounts, vec![("B", 1), ("C", 2)]);
    assert_eq!(table.rows[0].total_inbound_amount, Decimal::new(30000, 2));
    assert_eq!(table.rows[1].indirect_inbound_amount, Decimal::new(5000, 2));

    Ok(())
}

#[tokio::test]
async fn test_engine_discards_rows_left_from_earlier_run() -> Result<()> {
    let storage = Arc::new(RowStorage::new());
    let transactions = Arc::new(sample_transactions());
    let settings = NeighborhoodSettings::new(5, 1);

    //NOTE: Rows for A are written straight to storage and never collected
    DateWorker::new(date(3), vec!["A".to_string()], transactions.clone(), settings, storage.clone()).process();
    assert!(!storage.is_empty());

    let engine = FeatureEngine::new(storage.clone(), settings);
    let table = engine.run(transactions, Arc::new(vec![AlertRecord::new("E", date(4))])).await?;

    assert!(!table.is_empty());
    assert!(table.rows.iter().all(|row| row.source_account_id == "E"));
    assert!(storage.is_empty());

    Ok(())
}
