use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error: could not read [{path}] | {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error
    },
    #[error("Config error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config error: environment [{env}] was not found")]
    MissingEnvironment {
        env: String
    },
    #[error("Config error: required key [{key}] is missing")]
    MissingKey {
        key: String
    },
    #[error("Config error: key [{key}] is invalid | {reason}")]
    InvalidValue {
        key: String,
        reason: String
    }
}

impl ConfigError {
    pub fn missing_key(key: &str) -> Self {
        Self::MissingKey { key: key.to_string() }
    }

    pub fn invalid_value(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue { key: key.to_string(), reason: reason.into() }
    }
}
