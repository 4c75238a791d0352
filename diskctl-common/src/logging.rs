//! Tracing setup shared by the `diskctl-apid` daemon and the mount agent.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Console log rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, colored when attached to a tty.
    Text,
    /// One JSON object per line, for log aggregation.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("unknown log format '{}'", other)),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// `level` is an `EnvFilter` directive (e.g. `"info"`, `"diskctl_core=debug,info"`);
/// `RUST_LOG` overrides it when set.
pub fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init()?,
        LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).try_init()?,
    }

    Ok(())
}
