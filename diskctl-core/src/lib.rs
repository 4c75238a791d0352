//! The Selection & Attachment Core (§4.5): the LogicalUnit lifecycle state
//! machine and the boot/map negotiations built on top of the LVM driver,
//! the target driver and the metadata store.

pub mod attach;
pub mod attach_all;
pub mod boot;
pub mod destroy;
pub mod device_path;
pub mod error;
pub mod lifecycle;
pub mod locks;
pub mod map;
pub mod mutations;
pub mod responses;

pub use error::{Error, Result};

use std::time::Duration;

use diskctl_runner::CommandRunner;
use locks::TargetLocks;
use sqlx::SqlitePool;

/// The Core's dependencies, handed to every operation in this crate: the
/// metadata store pool, the command runner shelling out to LVM/tgtadm, and
/// the per-target advisory locks guarding boot/map negotiations.
#[derive(Clone)]
pub struct Core {
    pub pool: SqlitePool,
    pub runner: CommandRunner,
    pub locks: TargetLocks,
}

impl Core {
    /// Builds a Core with the default advisory-lock timeout
    /// ([`locks::DEFAULT_LOCK_TIMEOUT`]).
    pub fn new(pool: SqlitePool, runner: CommandRunner) -> Self {
        Self::with_lock_timeout(pool, runner, locks::DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(pool: SqlitePool, runner: CommandRunner, lock_timeout: Duration) -> Self {
        Self {
            pool,
            runner,
            locks: TargetLocks::new(lock_timeout),
        }
    }
}
