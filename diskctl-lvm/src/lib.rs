//! LVM2 and `fdisk`/`mount`/`dd` driving for the diskctl control plane.
//!
//! This crate wraps the `lvm2` and block-device command-line tools the same
//! way the rest of the control plane wraps `tgtadm`: every mutating call
//! goes through [`diskctl_runner::CommandRunner`] and is confirmed by
//! matching the tool's stdout against a known-good string in [`confirm`],
//! because none of these tools expose a structured success/failure signal.

pub mod confirm;
pub mod disk;
pub mod error;
pub mod logical_volume;
pub mod physical_volume;
pub mod volume_group;

pub use disk::{Disk, Partition};
pub use error::{Error, Result};
pub use logical_volume::{LogicalVolume, Snapshot};
pub use physical_volume::PhysicalVolume;
pub use volume_group::VolumeGroup;
