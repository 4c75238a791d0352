//! `tgtadm` driving for the diskctl control plane.
//!
//! Every mutating call here follows tgtadm's own success convention: no
//! output means success, any output (including the well-known
//! `"can't find the target"`) means failure. There is no structured exit
//! status to lean on, so [`target::Target`] always runs in merged
//! stdout+stderr mode via [`diskctl_runner::CommandRunner::run_merged`].

pub mod error;
pub mod initiator;
pub mod target;

pub use error::{Error, Result};
pub use initiator::{Initiator, ALL};
pub use target::{qualified_name, Target};
