//! # diskctl API daemon
//!
//! HTTP control plane for diskless iSCSI boot. Exposes CRUD over PDUs,
//! KVMs, initiators, targets, logical units and snapshots, plus the
//! boot/map negotiation endpoints PXE firmware calls on every boot
//! attempt.
//!
//! ## Usage
//! ```bash
//! diskctl-apid --config /etc/diskctl/apid.yaml
//! ```

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use diskctl_common::logging::{self, LogFormat};
use diskctl_core::Core;
use diskctl_runner::CommandRunner;
use tracing::{error, info};

mod cli;
mod config;
mod error;
mod handlers;
mod routes;

use cli::Args;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => Some(cfg),
        Err(_) if args.config == "/etc/diskctl/apid.yaml" => None,
        Err(e) => {
            logging::init_logging(&args.log_level, LogFormat::Text)?;
            error!(error = %e, path = %args.config, "failed to load configuration");
            return Err(e);
        }
    };
    let found_config_file = config.is_some();
    let config = config.unwrap_or_default().with_cli_overrides(&args);

    let log_format: LogFormat = config.logging.format.parse().unwrap_or(LogFormat::Text);
    logging::init_logging(&args.log_level, log_format)?;

    info!(version = env!("CARGO_PKG_VERSION"), "starting diskctl API daemon");
    if found_config_file {
        info!(config_path = %args.config, "configuration loaded");
    } else {
        info!("no config file found, using defaults");
    }

    let pool = diskctl_store::connect(&config.database.path).await?;
    let runner = CommandRunner::with_overrides(config.tools.overrides.clone());
    let core = Core::with_lock_timeout(pool, runner, Duration::from_secs(config.server.advisory_lock_timeout_secs));

    let app = routes::build(core);

    info!(listen = %config.server.listen_address, "listening");
    let listener = tokio::net::TcpListener::bind(&config.server.listen_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
