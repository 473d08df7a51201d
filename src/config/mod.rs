mod types;

pub use types::*;

use actionforge_db::PoolOptions;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    tracing::debug!("Loaded config from {:?}", path);

    Ok(config)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./actionforge.toml",
        "~/.config/actionforge/config.toml",
        "/etc/actionforge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.database.path.as_os_str().is_empty() {
        anyhow::bail!("Database path cannot be empty");
    }

    if config.database.pool_size == 0 {
        anyhow::bail!("Database pool_size must be at least 1");
    }

    if config.database.busy_timeout_ms == 0 {
        tracing::warn!("database.busy_timeout_ms is 0; concurrent writers will fail immediately");
    }

    Ok(())
}

impl DatabaseConfig {
    /// Pool settings derived from this section.
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            max_size: self.pool_size,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }
}
