pub mod control_devices;
pub mod initiators;
pub mod logical_units;
pub mod snapshots;
pub mod targets;
