//! # diskctl mount agent
//!
//! Stand-alone tool an operator runs on the control host: it polls the API
//! daemon for a MODIFIED logical unit, mounts its device path locally, waits
//! for the operator to inspect it, then unmounts.
//!
//! ## Usage
//! ```bash
//! diskctl-mount-agent --config /etc/diskctl/mount-agent.yaml
//! ```

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use diskctl_common::logging::{self, LogFormat};
use diskctl_lvm::Disk;
use diskctl_runner::CommandRunner;
use tracing::{info, warn};

mod cli;
mod config;
mod finder;

use cli::Args;
use config::Config;
use finder::DiskFinder;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(&args.log_level, LogFormat::Text)?;

    let config = match Config::load(&args.config) {
        Ok(cfg) => {
            info!(config_path = %args.config, "configuration loaded");
            cfg
        }
        Err(_) if args.config == "/etc/diskctl/mount-agent.yaml" => {
            info!("no config file found, using defaults");
            Config::default()
        }
        Err(e) => {
            return Err(e);
        }
    };
    let config = config.with_cli_overrides(&args);

    let finder = DiskFinder::new(config.api_base_url.clone());
    let runner = CommandRunner::new();

    info!(api_base_url = %config.api_base_url, "waiting for a modified logical unit");
    let device_path = loop {
        if let Some(path) = finder.get_disk_to_mount().await {
            break path;
        }
        tokio::time::sleep(Duration::from_secs(config.poll_interval_secs)).await;
    };

    info!(device_path = %device_path, mount_point = %config.mount_point, "mounting");
    let mut disk = Disk::new(&device_path);
    if !disk.mount(&runner, &config.mount_point).await? {
        warn!(device_path = %device_path, "no mountable partition found");
        return Ok(());
    }

    println!("Mounted {device_path} at {}. Press Enter when done inspecting.", config.mount_point);
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    info!(mount_point = %config.mount_point, "unmounting");
    Disk::unmount(&runner, &config.mount_point).await?;

    Ok(())
}
