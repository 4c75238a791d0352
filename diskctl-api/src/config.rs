//! Configuration management for the API daemon.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Args;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub tools: ToolsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(anyhow::anyhow!("config file not found: {}", path.display()));
        }
        let content = std::fs::read_to_string(path).with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content).with_context(|| "failed to parse config file")?;
        Ok(config)
    }

    /// Applies CLI argument overrides to the configuration.
    pub fn with_cli_overrides(mut self, args: &Args) -> Self {
        if let Some(listen) = &args.listen {
            self.server.listen_address = listen.clone();
        }
        if let Some(database) = &args.database {
            self.database.path = database.clone();
        }
        if let Some(log_format) = &args.log_format {
            self.logging.format = log_format.clone();
        }
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    /// How long a boot/map negotiation waits for a Target's advisory lock
    /// before giving up (§5).
    pub advisory_lock_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:8080".to_string(),
            advisory_lock_timeout_secs: diskctl_core::locks::DEFAULT_LOCK_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "/var/lib/diskctl/metadata.sqlite".to_string(),
        }
    }
}

/// Binary names for the external tools the Command Runner shells out to,
/// keyed by logical tool name (`"tgtadm"`, `"lvcreate"`, `"fdisk"`, ...).
/// Empty by default, which resolves every tool by its bare name on `PATH`;
/// populated in tests to point at fakes instead of the real tgtadm/lvm2
/// installation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub overrides: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: "text".to_string() }
    }
}
