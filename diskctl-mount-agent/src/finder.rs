//! Finds the next MODIFIED logical unit and resolves its device path.

use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct LogicalUnitSummary {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct DevicePathResponse {
    result: bool,
    device_path: Option<String>,
}

pub struct DiskFinder {
    client: reqwest::Client,
    api_base_url: String,
}

impl DiskFinder {
    pub fn new(api_base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base_url,
        }
    }

    /// Picks the first logical unit with `status=modified` and returns the
    /// device path the control plane reports for it, if any.
    pub async fn get_disk_to_mount(&self) -> Option<String> {
        let url = format!("{}/logical_units?status=modified", self.api_base_url);
        let response = match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                warn!(status = %resp.status(), "listing modified logical units failed");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "failed to reach the control plane");
                return None;
            }
        };

        let units: Vec<LogicalUnitSummary> = match response.json().await {
            Ok(units) => units,
            Err(e) => {
                warn!(error = %e, "could not parse the logical unit list");
                return None;
            }
        };
        let lu = units.into_iter().next()?;
        debug!(logical_unit_id = lu.id, "found a modified logical unit");

        let url = format!("{}/logical_units/{}/get_mount_device_path", self.api_base_url, lu.id);
        let response = self.client.get(&url).send().await.ok()?;
        let body: DevicePathResponse = response.json().await.ok()?;
        if body.result {
            body.device_path
        } else {
            None
        }
    }
}
