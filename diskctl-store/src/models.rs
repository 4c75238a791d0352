//! Row types for every table in §3.1. Mapping from `sqlx::sqlite::SqliteRow`
//! is done explicitly in each repository module rather than through derive
//! magic, so a schema change surfaces as a compile error at the call site
//! that reads the changed column.

use chrono::{DateTime, Utc};

/// `pdus` / `kvms` share this exact column shape; see [`ControlDeviceKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct ControlDevice {
    pub id: i64,
    pub name: String,
    pub ip_address: String,
    pub mac_address: Option<String>,
    pub total_ports: i64,
    pub model: String,
    pub serial: String,
    pub username: String,
    pub password: String,
}

/// Which physical table a [`ControlDevice`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlDeviceKind {
    Pdu,
    Kvm,
}

impl ControlDeviceKind {
    pub fn table(self) -> &'static str {
        match self {
            ControlDeviceKind::Pdu => "pdus",
            ControlDeviceKind::Kvm => "kvms",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitiatorMode {
    Automatic,
    Manual,
}

impl InitiatorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InitiatorMode::Automatic => "A",
            InitiatorMode::Manual => "M",
        }
    }

    pub fn from_query_literal(s: &str) -> Option<Self> {
        match s {
            "A" => Some(InitiatorMode::Automatic),
            "M" => Some(InitiatorMode::Manual),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Initiator {
    pub id: i64,
    pub mac_address: String,
    pub name: String,
    pub mode: InitiatorMode,
    pub ip_address: Option<String>,
    pub pdu_id: Option<i64>,
    pub pdu_port: Option<i64>,
    pub kvm_id: Option<i64>,
    pub kvm_port: Option<i64>,
    pub last_initiated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    Offline,
    Online,
    Locked,
}

impl TargetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetStatus::Offline => "OFFLINE",
            TargetStatus::Online => "ONLINE",
            TargetStatus::Locked => "LOCKED",
        }
    }

    pub fn from_query_literal(s: &str) -> Option<Self> {
        match s {
            "OFFLINE" => Some(TargetStatus::Offline),
            "ONLINE" => Some(TargetStatus::Online),
            "LOCKED" => Some(TargetStatus::Locked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: i64,
    pub name: String,
    pub boot: bool,
    pub active: bool,
    pub status: TargetStatus,
    pub initiator_id: Option<i64>,
}

/// The five-state lifecycle from §4.5.2, stored as its spec-mandated
/// numeric encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalUnitStatus {
    Offline = 0,
    Online = 1,
    Busy = 2,
    Modified = 3,
    Mounted = 4,
}

impl LogicalUnitStatus {
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(LogicalUnitStatus::Offline),
            1 => Some(LogicalUnitStatus::Online),
            2 => Some(LogicalUnitStatus::Busy),
            3 => Some(LogicalUnitStatus::Modified),
            4 => Some(LogicalUnitStatus::Mounted),
            _ => None,
        }
    }

    pub fn as_i64(self) -> i64 {
        self as i64
    }

    pub fn from_query_literal(s: &str) -> Option<Self> {
        match s {
            "offline" => Some(LogicalUnitStatus::Offline),
            "online" => Some(LogicalUnitStatus::Online),
            "busy" => Some(LogicalUnitStatus::Busy),
            "modified" => Some(LogicalUnitStatus::Modified),
            "mounted" => Some(LogicalUnitStatus::Mounted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalUnit {
    pub id: i64,
    pub name: String,
    pub vendor_id: String,
    pub product_id: String,
    pub product_rev: String,
    pub vg_name: String,
    pub size_gib: f64,
    pub use_flag: bool,
    pub status: LogicalUnitStatus,
    pub boot_count: i64,
    pub last_attached: Option<DateTime<Utc>>,
    pub target_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub id: i64,
    pub name: String,
    pub size_gib: f64,
    pub active: bool,
    pub description: String,
    pub logical_unit_id: i64,
}
