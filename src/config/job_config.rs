use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::errors::ConfigError;
use crate::graph::Reachability;

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Header names binding the raw input files to the fields the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBindings {
    pub date: String,
    pub sender: String,
    pub receiver: String,
    pub amount: String,
    pub alert_account: String,
    pub alert_date: String,
    /// When set, alert rows with an empty flag are ignored.
    pub alert_flag: Option<String>
}

/// Parameters of the neighborhood search shared by every alert date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborhoodSettings {
    /// Days looked back from the alert date, both ends inclusive.
    pub txn_days: u32,
    /// Maximum hop count from the alerted account.
    pub radius: u32,
    pub reachability: Reachability
}

impl NeighborhoodSettings {
    pub fn new(txn_days: u32, radius: u32) -> Self {
        Self {
            txn_days,
            radius,
            reachability: Reachability::default()
        }
    }

    pub fn with_reachability(mut self, reachability: Reachability) -> Self {
        self.reachability = reachability;
        self
    }
}

/// One environment section of the job file.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub transactions_path: PathBuf,
    pub alerts_path: PathBuf,
    pub date_format: String,
    pub columns: ColumnBindings,
    pub neighborhood: NeighborhoodSettings
}
/// Raw `[env]` table as written in the job file. Every key is optional here so a
/// missing one can be reported by name once the section has been deserialized.
#[derive(Debug, Deserialize)]
struct JobSection {
    transactions_path: Option<String>,
    alerts_path: Option<String>,
    txn_days: Option<i64>,
    radius: Option<i64>,
    reachability: Option<Reachability>,
    date_format: Option<String>,
    date_column_name: Option<String>,
    sender_column_name: Option<String>,
    receiver_column_name: Option<String>,
    raw_txn_amt_column_name: Option<String>,
    alert_account_column_name: Option<String>,
    alert_date_column_name: Option<String>,
    alert_flag_column_name: Option<String>
}

impl JobConfig {
    /// Reads the job file and resolves the `[env]` table.
    ///
    /// # Errors
    /// Fails before any data is touched when the file is unreadable, the environment
    /// table is absent, or a required key is missing or malformed.
    pub fn load(path: impl AsRef<Path>, env: &str) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source
        })?;

        Self::parse(&content, env)
    }

    pub fn parse(content: &str, env: &str) -> Result<Self, ConfigError> {
        let mut sections: HashMap<String, JobSection> = toml::from_str(content)?;

        let section = sections.remove(env)
            .ok_or_else(|| ConfigError::MissingEnvironment { env: env.to_string() })?;

        Self::try_from(section)
    }
}

impl TryFrom<JobSection> for JobConfig {
    type Error = ConfigError;

    fn try_from(section: JobSection) -> Result<Self, Self::Error> {
        let columns = ColumnBindings {
            date: required_str(section.date_column_name, "date_column_name")?,
            sender: required_str(section.sender_column_name, "sender_column_name")?,
            receiver: required_str(section.receiver_column_name, "receiver_column_name")?,
            amount: required_str(section.raw_txn_amt_column_name, "raw_txn_amt_column_name")?,
            alert_account: required_str(section.alert_account_column_name, "alert_account_column_name")?,
            alert_date: required_str(section.alert_date_column_name, "alert_date_column_name")?,
            alert_flag: optional_str(section.alert_flag_column_name, "alert_flag_column_name")?
        };

        let neighborhood = NeighborhoodSettings::new(
            required_u32(section.txn_days, "txn_days")?,
            required_u32(section.radius, "radius")?
        ).with_reachability(section.reachability.unwrap_or_default());

        Ok(Self {
            transactions_path: PathBuf::from(required_str(section.transactions_path, "transactions_path")?),
            alerts_path: PathBuf::from(required_str(section.alerts_path, "alerts_path")?),
            date_format: optional_str(section.date_format, "date_format")?
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
            columns,
            neighborhood
        })
    }
}

fn required_str(value: Option<String>, key: &str) -> Result<String, ConfigError> {
    optional_str(value, key)?.ok_or_else(|| ConfigError::missing_key(key))
}

fn optional_str(value: Option<String>, key: &str) -> Result<Option<String>, ConfigError> {
    match value {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::invalid_value(key, "value is an empty string"))
        }
        Some(value) => Ok(Some(value.trim().to_string()))
    }
}

fn required_u32(value: Option<i64>, key: &str) -> Result<u32, ConfigError> {
    let value = value.ok_or_else(|| ConfigError::missing_key(key))?;

    u32::try_from(value)
        .map_err(|_| ConfigError::invalid_value(key, format!("expected a non-negative integer, got {value}")))
}
