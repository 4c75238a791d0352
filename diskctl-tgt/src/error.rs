//! Error types for the tgtadm driver.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// `tgtadm` could not be spawned at all (binary missing, etc.).
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// The referenced target, LUN, or connection does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Two logical units within the same target would collide on LUN id.
    #[error("lun id {0} is already attached under this target")]
    LunCollision(u32),

    /// tgtadm output could not be parsed into the expected shape.
    #[error("failed to parse tgtadm output: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
