//! Command-line argument parsing.

use clap::Parser;

/// diskctl mount agent - mounts a MODIFIED logical unit locally for operator inspection.
#[derive(Parser, Debug)]
#[command(name = "diskctl-mount-agent")]
#[command(about = "Mounts a MODIFIED logical unit locally for operator inspection")]
#[command(version)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/diskctl/mount-agent.yaml")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Base URL of the diskctl API daemon
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Local directory to mount the disk at
    #[arg(long)]
    pub mount_point: Option<String>,
}
