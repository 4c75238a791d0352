//! LVM physical volumes (`pvcreate`/`pvdisplay`/`pvremove`).

use diskctl_runner::CommandRunner;

use crate::confirm;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalVolume {
    path: String,
}

impl PhysicalVolume {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn create(runner: &CommandRunner, device_path: &str) -> Result<bool> {
        let output = runner
            .run("pvcreate", &[device_path])
            .await
            .ok_or_else(|| Error::CommandFailed(format!("pvcreate {device_path}")))?;
        Ok(output.contains(&confirm::pv_created(device_path)))
    }

    pub async fn get_all(runner: &CommandRunner) -> Result<Vec<PhysicalVolume>> {
        let output = runner
            .run("pvdisplay", &["-c"])
            .await
            .ok_or_else(|| Error::CommandFailed("pvdisplay -c".to_string()))?;

        Ok(output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.contains("is a new physical volume of"))
            .filter_map(|l| l.split(':').next())
            .map(PhysicalVolume::new)
            .collect())
    }

    pub async fn remove(&self, runner: &CommandRunner) -> Result<bool> {
        let output = runner
            .run("pvremove", &[&self.path])
            .await
            .ok_or_else(|| Error::CommandFailed(format!("pvremove {}", self.path)))?;
        Ok(output.contains(&confirm::pv_removed(&self.path)))
    }
}
