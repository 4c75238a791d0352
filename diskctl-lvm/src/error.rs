//! Error types for the LVM driver.

use thiserror::Error;

/// Errors produced by the LVM driver.
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying `lvm2`/`fdisk`/`dd`/`mount` command failed or produced
    /// output that didn't match the expected success confirmation.
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// Requested entity (volume group, logical volume, snapshot, partition)
    /// does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation is a snapshot-of-snapshot operation, which LVM does not
    /// support; see `Snapshot`'s refusal of `get_snapshots`/`create_snapshot`/
    /// `remove_snapshot`/`revert_to_snapshot`/`rename_snapshot`.
    #[error("not applicable: snapshot(s) of a snapshot are not supported")]
    NotApplicable,

    /// Tool output could not be parsed into the expected shape.
    #[error("failed to parse command output: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
