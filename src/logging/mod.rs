
use std::env;
use std::fs::{create_dir_all, File};
use std::io;
use std::io::stderr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

/// Overrides the directory under which `logs/` is created.
pub const APP_HOME_VAR: &str = "APP_HOME";
const LOG_DIR: &str = "logs";

pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

/// `<app_home>/logs`, falling back to the working directory.
pub fn log_directory(app_home: Option<PathBuf>) -> PathBuf {
    app_home.filter(|home| !home.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_DIR)
}

/// Creates `directory` if needed and opens a fresh log file named after `started`.
pub fn create_log_file(directory: &Path, started: DateTime<Local>) -> io::Result<(PathBuf, File)> {
    create_dir_all(directory)?;

    let path = directory.join(format!("{}.log", started.format("%Y%m%d_%H%M%S")));
    let file = File::create(&path)?;

    Ok((path, file))
}

/// Installs the global subscriber: a terminal layer on stderr and a plain-text file
/// layer, both at `level`. Returns where the file layer writes.
pub fn setup_logging(level: LevelFilter) -> io::Result<PathBuf> {
    let directory = log_directory(env::var_os(APP_HOME_VAR).map(PathBuf::from));
    let (path, file) = create_log_file(&directory, Local::now())?;

    //NOTE: stdout carries the result table, so logs go to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    let file_log = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .with(file_log)
        .init();

    Ok(path)
}
