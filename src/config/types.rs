use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite database file (created on first use)
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Maximum number of pooled connections (default: 4)
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// How long a writer waits on a locked database, in milliseconds (default: 5000)
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            pool_size: default_pool_size(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("actionforge.sqlite")
}

fn default_pool_size() -> u32 {
    4
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. "actionforge=debug". `RUST_LOG` wins when set.
    #[serde(default)]
    pub filter: Option<String>,
}
