//! The metadata store: a SQLite-backed record of PDUs, KVMs, initiators,
//! targets, logical units, and snapshots (§3/§3.1).
//!
//! Row-to-struct mapping is done by hand in each repository module instead
//! of through a query-builder or ORM, so a schema change is a compile error
//! at the one call site that reads the changed column rather than a runtime
//! surprise buried in generated code.

pub mod control_devices;
pub mod error;
pub mod initiators;
pub mod logical_units;
pub mod models;
pub mod pool;
pub mod schema;
pub mod snapshots;
pub mod targets;

pub use error::{Error, Result};
pub use pool::connect;
