//! Command-line argument parsing.

use clap::Parser;

/// diskctl API daemon - HTTP control plane for diskless iSCSI boot.
#[derive(Parser, Debug)]
#[command(name = "diskctl-apid")]
#[command(about = "HTTP control plane for diskless iSCSI boot")]
#[command(version)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/diskctl/apid.yaml")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Listen address for the HTTP server
    #[arg(long)]
    pub listen: Option<String>,

    /// Path to the SQLite metadata store file
    #[arg(long)]
    pub database: Option<String>,

    /// Log output format (text, json)
    #[arg(long)]
    pub log_format: Option<String>,
}
