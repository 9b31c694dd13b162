mod config;
mod engine;
mod features;
mod graph;
mod logging;
mod models;
mod sources;
mod storage;
mod types;
mod workers;

use std::io::stdout;
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use csv::WriterBuilder;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};

use crate::config::JobConfig;
use crate::engine::FeatureEngine;
use crate::logging::{parse_log_level, setup_logging, APP_HOME_VAR};
use crate::models::{FeatureRow, ResultTable};
use crate::sources::{CsvAlertSource, CsvTransactionSource};
use crate::storage::RowStorage;

const DEFAULT_ENV: &str = "dev";

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: alert-neighborhood-features [job].toml [env:optional] [log_level:optional] > [output].csv");
        eprintln!("Available environments: any table of the job file (default: {DEFAULT_ENV})");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: info)");
        exit(1);
    }

    let config_path = &args[1];
    let env = args.get(2).map(String::as_str).unwrap_or(DEFAULT_ENV);
    let log_level = args.get(3)
        .map(|s| parse_log_level(s)).unwrap_or(LevelFilter::INFO);

    let log_file = setup_logging(log_level)?;

    info!("Writing logs to [{}] (set {APP_HOME_VAR} to move them)", log_file.display());

    let config = JobConfig::load(config_path, env)
        .inspect_err(|error| error!("{error}"))?;

    info!("Using config [{config_path}] with environment [{env}]");
    info!(
        "Window of [{}] days, radius [{}], [{:?}] reachability",
        config.neighborhood.txn_days, config.neighborhood.radius, config.neighborhood.reachability
    );

    let engine = FeatureEngine::new(Arc::new(RowStorage::new()), config.neighborhood);

    let timer = Instant::now();
    let table = engine.run(
        Arc::new(CsvTransactionSource::from_config(&config)),
        Arc::new(CsvAlertSource::from_config(&config))
    ).await?;
    let duration = timer.elapsed();

    info!("Extracted neighborhood features in: {duration:?}");

    for skipped in &table.skipped {
        warn!("Alert account [{}] on [{}] is missing from the output: {}", skipped.account_id, skipped.alert_date, skipped.reason);
    }

    if table.is_empty() {
        warn!("No alert account produced any rows, the output holds the header only");
    }

    write_results_to_stdout(&table)?;

    Ok(())
}

fn write_results_to_stdout(table: &ResultTable) -> Result<()> {
    let mut output = WriterBuilder::new()
        .has_headers(false)
        .from_writer(stdout().lock());

    output.write_record(FeatureRow::COLUMNS)?;

    for row in &table.rows {
        output.serialize(row)?;
    }

    output.flush()?;

    Ok(())
}
