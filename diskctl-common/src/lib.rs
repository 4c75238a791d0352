//! Shared utilities for the diskctl control-plane binaries.
//!
//! Currently this is just the [`logging`] setup, kept in its own crate so
//! the API daemon and the mount agent initialize tracing identically.

pub mod logging;

pub use logging::{init_logging, LogFormat};
