use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source error: could not open [{path}] | {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error
    },
    #[error("Source error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Source error: column [{column}] is missing from [{path}]")]
    MissingColumn {
        column: String,
        path: String
    },
    #[error("Source error: row [{row}] has no value for column [{column}]")]
    EmptyField {
        row: u64,
        column: String
    },
    #[error("Source error: row [{row}] has an invalid date [{value}]")]
    InvalidDate {
        row: u64,
        value: String
    },
    #[error("Source error: row [{row}] has an invalid amount [{value}]")]
    InvalidAmount {
        row: u64,
        value: String
    },
    #[error("Source error: row [{row}] has a negative amount [{value}]")]
    NegativeAmount {
        row: u64,
        value: String
    }
}
