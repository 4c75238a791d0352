//! Configuration management for the mount agent.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Args;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub mount_point: String,
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".to_string(),
            mount_point: "/mnt".to_string(),
            poll_interval_secs: 10,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(anyhow::anyhow!("config file not found: {}", path.display()));
        }
        let content = std::fs::read_to_string(path).with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content).with_context(|| "failed to parse config file")?;
        Ok(config)
    }

    pub fn with_cli_overrides(mut self, args: &Args) -> Self {
        if let Some(url) = &args.api_base_url {
            self.api_base_url = url.clone();
        }
        if let Some(mount_point) = &args.mount_point {
            self.mount_point = mount_point.clone();
        }
        self
    }
}
