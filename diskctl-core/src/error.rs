//! The Core's error taxonomy (§7): one process-wide enum, mapped to an HTTP
//! status and JSON body at the API edge rather than scattered through the
//! state machine itself.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Metadata row or external (LVM/tgtadm) resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The state machine refused a transition (e.g. revert while BUSY).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An LVM or tgtadm command failed.
    #[error("external command failed: {0}")]
    External(String),

    /// An impossible mapping was observed (e.g. daemon LUN id != expected
    /// id); no metadata mutation has happened when this is returned.
    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error(transparent)]
    Database(#[from] diskctl_store::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<diskctl_lvm::Error> for Error {
    fn from(e: diskctl_lvm::Error) -> Self {
        match e {
            diskctl_lvm::Error::NotFound(what) => Error::NotFound(what),
            other => Error::External(other.to_string()),
        }
    }
}

impl From<diskctl_tgt::Error> for Error {
    fn from(e: diskctl_tgt::Error) -> Self {
        match e {
            diskctl_tgt::Error::NotFound(what) => Error::NotFound(what),
            other => Error::External(other.to_string()),
        }
    }
}
