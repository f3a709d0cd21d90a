//! Environment configuration, read through `dotenv` so a local `.env` file
//! is honoured.

use thiserror::Error;

const DEFAULT_MAX_CONNECTION_POOLING: u32 = 5;
const DEFAULT_LOG_FILE: &str = "app.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub max_connection_pooling: u32,
    pub log_file: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| dotenv::var(name).ok())
    }

    /// Builds a config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // mandatory fields
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        // optional fields
        let max_connection_pooling = match lookup("MAX_CONNECTION_POOLING") {
            Some(value) => value.parse::<u32>().map_err(|_| ConfigError::Invalid {
                name: "MAX_CONNECTION_POOLING",
                value,
            })?,
            None => DEFAULT_MAX_CONNECTION_POOLING,
        };
        let log_file = lookup("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

        Ok(Self {
            database_url,
            max_connection_pooling,
            log_file,
        })
    }
}
