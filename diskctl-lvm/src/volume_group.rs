//! LVM volume groups: creation, membership, and the logical volumes they
//! contain.

use diskctl_runner::CommandRunner;

use crate::confirm;
use crate::error::{Error, Result};
use crate::logical_volume::LogicalVolume;
use crate::physical_volume::PhysicalVolume;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeGroup {
    name: String,
}

impl VolumeGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn create(runner: &CommandRunner, name: &str, pvs: &[&str]) -> Result<bool> {
        let mut args = vec!["vgcreate", name];
        args.extend(pvs);
        let output = runner
            .run("vgcreate", &args[1..])
            .await
            .ok_or_else(|| Error::CommandFailed("vgcreate".to_string()))?;
        Ok(output.contains(&confirm::vg_created(name)))
    }

    pub async fn get_all(runner: &CommandRunner) -> Result<Vec<VolumeGroup>> {
        let output = runner
            .run("vgdisplay", &["-c"])
            .await
            .ok_or_else(|| Error::CommandFailed("vgdisplay -c".to_string()))?;

        Ok(output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .filter_map(|l| l.split(':').next())
            .map(VolumeGroup::new)
            .collect())
    }

    pub async fn remove(&self, runner: &CommandRunner) -> Result<bool> {
        let output = runner
            .run("vgremove", &[&self.name])
            .await
            .ok_or_else(|| Error::CommandFailed(format!("vgremove {}", self.name)))?;
        Ok(output.contains(&confirm::vg_removed(&self.name)))
    }

    pub async fn contains_logical_volume(&self, runner: &CommandRunner, lv_name: &str) -> Result<bool> {
        let output = runner
            .run("lvdisplay", &["-c"])
            .await
            .ok_or_else(|| Error::CommandFailed("lvdisplay -c".to_string()))?;

        for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let columns: Vec<&str> = line.split(':').collect();
            if columns.len() >= 2 && columns[0].contains(lv_name) && columns[1] == self.name {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub async fn create_logical_volume(
        &self,
        runner: &CommandRunner,
        lv_name: &str,
        size: f64,
        unit: &str,
    ) -> Result<bool> {
        let size_arg = format!("{size}{unit}");
        let output = runner
            .run(
                "lvcreate",
                &["--name", lv_name, "--size", &size_arg, "-W", "y", &self.name],
            )
            .await
            .ok_or_else(|| Error::CommandFailed(format!("lvcreate {lv_name}")))?;
        Ok(output.contains(&confirm::lv_created(lv_name)))
    }

    pub async fn remove_logical_volume(&self, runner: &CommandRunner, lv_name: &str) -> Result<bool> {
        let target = format!("{}/{}", self.name, lv_name);
        let output = runner
            .run("lvremove", &["--force", &target])
            .await
            .ok_or_else(|| Error::CommandFailed(format!("lvremove {target}")))?;
        Ok(output.contains(&confirm::lv_removed(lv_name)))
    }

    pub async fn rename_logical_volume(&self, runner: &CommandRunner, lv_name: &str, new_name: &str) -> Result<bool> {
        let output = runner
            .run("lvrename", &[&self.name, lv_name, new_name])
            .await
            .ok_or_else(|| Error::CommandFailed(format!("lvrename {lv_name} {new_name}")))?;
        Ok(output.contains(&confirm::lv_renamed(lv_name, new_name, &self.name)))
    }

    /// Lists the base (non-snapshot) logical volumes in this group, or just
    /// the one matching `name` when given. Always returns a `Vec`, even for
    /// zero or one match (a prior implementation of this query sometimes
    /// returned a bare item instead of a one-element list; this
    /// reimplementation normalizes to a list consistently).
    pub async fn get_logical_volumes(&self, runner: &CommandRunner, name: Option<&str>) -> Result<Vec<LogicalVolume>> {
        let output = runner
            .run("lvdisplay", &["-c"])
            .await
            .ok_or_else(|| Error::CommandFailed("lvdisplay -c".to_string()))?;

        let mut lvs = Vec::new();
        for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let columns: Vec<&str> = line.split(':').collect();
            if columns.len() < 2 || columns[1] != self.name {
                continue;
            }
            if let Some(name) = name {
                if !columns[0].contains(name) {
                    continue;
                }
            }
            if is_snapshot(runner, columns[0], &self.name).await? {
                continue;
            }
            lvs.push(LogicalVolume::base(self.name.clone(), lv_name_from_path(columns[0])));
        }
        Ok(lvs)
    }

    pub async fn include_physical_volume(&self, runner: &CommandRunner, pv: &PhysicalVolume) -> Result<bool> {
        let output = runner.run("vgextend", &[&self.name, pv.path()]).await;
        Ok(output.is_some())
    }

    pub async fn exclude_physical_volume(&self, runner: &CommandRunner, pv: &PhysicalVolume) -> Result<bool> {
        let output = runner.run("vgreduce", &[&self.name, pv.path()]).await;
        Ok(output.is_some())
    }

    pub async fn get_physical_volumes(&self, runner: &CommandRunner) -> Result<Vec<PhysicalVolume>> {
        let output = runner
            .run("pvdisplay", &["-c"])
            .await
            .ok_or_else(|| Error::CommandFailed("pvdisplay -c".to_string()))?;

        Ok(output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .filter_map(|l| {
                let columns: Vec<&str> = l.split(':').collect();
                if columns.len() >= 2 && columns[1] == self.name {
                    Some(PhysicalVolume::new(columns[0]))
                } else {
                    None
                }
            })
            .collect())
    }
}

async fn is_snapshot(runner: &CommandRunner, lv_path: &str, vg_name: &str) -> Result<bool> {
    let output = runner
        .run("lvs", &[lv_path])
        .await
        .ok_or_else(|| Error::CommandFailed(format!("lvs {lv_path}")))?;

    for line in output.lines().map(str::trim) {
        if line.is_empty() || !line.contains(vg_name) {
            continue;
        }
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() >= 3 {
            return Ok(columns[2].to_lowercase().starts_with('s'));
        }
    }
    Ok(false)
}

fn lv_name_from_path(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}
