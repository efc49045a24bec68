//! Environment configuration.
//!
//! Everything is read from the process environment (a `.env` file is loaded
//! by the binary before this runs). Defaults match a local development
//! MySQL.

use std::time::Duration;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "mysql://root@localhost:3306/partition_test";
const DEFAULT_TABLE: &str = "events";
const DEFAULT_RETENTION_DAYS: u32 = 7;
const DEFAULT_INTERVAL_SECS: u64 = 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid {kind}: {value}")]
    Invalid {
        var: &'static str,
        kind: &'static str,
        value: String,
    },
}

/// Runtime configuration for the scythe binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// MySQL connection URL; the schema in the URL is the one reconciled.
    pub database_url: String,
    /// The single range-partitioned table to maintain.
    pub table: String,
    /// Days of data to keep, counting today.
    pub retention_days: u32,
    /// How often the scheduler runs a pass.
    pub interval: Duration,
}

impl Config {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            table: var_or("PARTITION_TABLE", DEFAULT_TABLE),
            retention_days: parsed_var("DATA_RETENTION_DAYS", "integer")?
                .unwrap_or(DEFAULT_RETENTION_DAYS),
            interval: Duration::from_secs(
                parsed_var("RECONCILE_INTERVAL_SECS", "number of seconds")?
                    .unwrap_or(DEFAULT_INTERVAL_SECS),
            ),
        })
    }
}

fn var_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn parsed_var<T: std::str::FromStr>(
    var: &'static str,
    kind: &'static str,
) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(None),
        Ok(value) => value.parse().map(Some).map_err(|_| ConfigError::Invalid {
            var,
            kind,
            value,
        }),
    }
}
