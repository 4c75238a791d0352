//! The `{result: bool, ...}` envelopes the automatic boot/map flows return
//! even on internal failure (§7's propagation policy for these two
//! endpoints, as opposed to the operator-initiated actions that fail loudly).

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BootResponse {
    pub result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lun: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iqn: Option<String>,
    pub message: String,
}

impl BootResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: false,
            lun: None,
            iqn: None,
            message: message.into(),
        }
    }

    pub fn success(lun_id: i64, iqn: String) -> Self {
        Self {
            result: true,
            lun: Some(format!("{lun_id:x}")),
            iqn: Some(iqn),
            message: "use lun id and iqn to form iSCSI URL".to_string(),
        }
    }
}

pub type MapResponse = BootResponse;

/// `{result: bool, message: string}`, used by the operator-initiated
/// logical-unit actions (revert/recreate).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActionResponse {
    pub result: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            result: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: false,
            message: message.into(),
        }
    }
}

/// `{result: bool, device_path: string?}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DevicePathResponse {
    pub result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
