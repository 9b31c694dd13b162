use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use tracing::{debug, error, info};

use crate::config::{ColumnBindings, JobConfig};
use crate::models::{AlertRecord, TransactionRecord};
use crate::sources::errors::SourceError;
use crate::sources::{AlertProvider, TransactionProvider};

/// Reads raw transactions from a CSV file whose headers are named by the job's
/// column bindings.
pub struct CsvTransactionSource {
    path: PathBuf,
    columns: ColumnBindings,
    date_format: String
}

impl CsvTransactionSource {
    pub fn new(path: impl Into<PathBuf>, columns: ColumnBindings, date_format: &str) -> Self {
        Self {
            path: path.into(),
            columns,
            date_format: date_format.to_string()
        }
    }

    pub fn from_config(config: &JobConfig) -> Self {
        Self::new(config.transactions_path.clone(), config.columns.clone(), &config.date_format)
    }

    fn parse(&self, record: &StringRecord, row: u64, columns: &[usize; 4]) -> Result<TransactionRecord, SourceError> {
        let [date, sender, receiver, amount] = *columns;

        Ok(TransactionRecord::new(
            parse_date(field(record, date, &self.columns.date, row)?, &self.date_format, row)?,
            field(record, sender, &self.columns.sender, row)?,
            field(record, receiver, &self.columns.receiver, row)?,
            parse_amount(field(record, amount, &self.columns.amount, row)?, row)?
        ))
    }
}

impl TransactionProvider for CsvTransactionSource {
    fn transactions(&self) -> Result<Vec<TransactionRecord>, SourceError> {
        let mut reader = open_reader(&self.path)?;
        let headers = reader.headers()?.clone();
        let columns = [
            column_index(&headers, &self.columns.date, &self.path)?,
            column_index(&headers, &self.columns.sender, &self.path)?,
            column_index(&headers, &self.columns.receiver, &self.path)?,
            column_index(&headers, &self.columns.amount, &self.path)?
        ];

        let mut transactions = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let row = index as u64 + 2;

            let parsed = result.map_err(SourceError::from)
                .and_then(|record| self.parse(&record, row, &columns));

            match parsed {
                Ok(transaction) => transactions.push(transaction),
                Err(error) => error!("{error}")
            }
        }

        info!("Loaded [{}] transactions from [{}]", transactions.len(), self.path.display());

        Ok(transactions)
    }
}

/// Reads alert notations from a CSV file whose headers are named by the job's
/// column bindings.
pub struct CsvAlertSource {
    path: PathBuf,
    columns: ColumnBindings,
    date_format: String
}

impl CsvAlertSource {
    pub fn new(path: impl Into<PathBuf>, columns: ColumnBindings, date_format: &str) -> Self {
        Self {
            path: path.into(),
            columns,
            date_format: date_format.to_string()
        }
    }

    pub fn from_config(config: &JobConfig) -> Self {
        Self::new(config.alerts_path.clone(), config.columns.clone(), &config.date_format)
    }

    fn parse(&self, record: &StringRecord, row: u64, account: usize, date: usize, flag: Option<usize>) -> Result<AlertRecord, SourceError> {
        let alert = AlertRecord::new(
            field(record, account, &self.columns.alert_account, row)?,
            parse_date(field(record, date, &self.columns.alert_date, row)?, &self.date_format, row)?
        );

        Ok(alert.with_flag(flag.and_then(|index| record.get(index)).filter(|value| !value.is_empty())))
    }
}

impl AlertProvider for CsvAlertSource {
    fn alerts(&self) -> Result<Vec<AlertRecord>, SourceError> {
        let mut reader = open_reader(&self.path)?;
        let headers = reader.headers()?.clone();
        let account = column_index(&headers, &self.columns.alert_account, &self.path)?;
        let date = column_index(&headers, &self.columns.alert_date, &self.path)?;
        let flag = match &self.columns.alert_flag {
            Some(column) => Some(column_index(&headers, column, &self.path)?),
            None => None
        };

        let mut alerts = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let row = index as u64 + 2;

            let parsed = result.map_err(SourceError::from)
                .and_then(|record| self.parse(&record, row, account, date, flag));

            match parsed {
                Ok(alert) if flag.is_some() && alert.flag.is_none() => {
                    debug!("Alert row [{row}] for account [{}] has no flag, ignoring", alert.account_id);
                }
                Ok(alert) => alerts.push(alert),
                Err(error) => error!("{error}")
            }
        }

        info!("Loaded [{}] alerts from [{}]", alerts.len(), self.path.display());

        Ok(alerts)
    }
}

fn open_reader(path: &Path) -> Result<Reader<BufReader<File>>, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source
    })?;

    Ok(ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(BufReader::new(file)))
}

fn column_index(headers: &StringRecord, column: &str, path: &Path) -> Result<usize, SourceError> {
    headers.iter()
        .position(|header| header == column)
        .ok_or_else(|| SourceError::MissingColumn {
            column: column.to_string(),
            path: path.display().to_string()
        })
}

fn field<'r>(record: &'r StringRecord, index: usize, column: &str, row: u64) -> Result<&'r str, SourceError> {
    record.get(index)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| SourceError::EmptyField { row, column: column.to_string() })
}

/// Accepts a bare date or a timestamp with a `%H:%M:%S` suffix, which is how most
/// warehouse exports write date columns.
fn parse_date(value: &str, format: &str, row: u64) -> Result<NaiveDate, SourceError> {
    NaiveDate::parse_from_str(value, format)
        .or_else(|_| NaiveDateTime::parse_from_str(value, &format!("{format} %H:%M:%S")).map(|timestamp| timestamp.date()))
        .map_err(|_| SourceError::InvalidDate { row, value: value.to_string() })
}

fn parse_amount(value: &str, row: u64) -> Result<Decimal, SourceError> {
    let amount = Decimal::from_str(value)
        .map_err(|_| SourceError::InvalidAmount { row, value: value.to_string() })?;

    if amount < Decimal::ZERO {
        return Err(SourceError::NegativeAmount { row, value: value.to_string() });
    }

    Ok(amount)
}
