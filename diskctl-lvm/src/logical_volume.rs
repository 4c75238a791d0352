//! Logical volumes and their snapshots.
//!
//! `Snapshot` wraps a `LogicalVolume` rather than extending it: LVM snapshots
//! share almost every operation with a base volume (path, name, parent
//! group) but diverge on size reporting (`COW-table size` instead of
//! `LV Size`) and flatly refuse a handful of operations a base volume
//! supports (you cannot snapshot a snapshot, or revert/rename/remove it
//! through the snapshot API). Composition lets `Snapshot` reuse the shared
//! parts and override or refuse the rest explicitly, instead of inheriting
//! methods it then has to override into errors.

use diskctl_runner::CommandRunner;

use crate::confirm;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalVolume {
    vg_name: String,
    name: String,
}

impl LogicalVolume {
    pub fn base(vg_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            vg_name: vg_name.into(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn volume_group(&self) -> &str {
        &self.vg_name
    }

    pub fn path(&self) -> String {
        format!("/dev/{}/{}", self.vg_name, self.name)
    }

    async fn info(&self, runner: &CommandRunner) -> Result<confirm::InfoMap> {
        let output = runner
            .run("lvdisplay", &[&self.path()])
            .await
            .ok_or_else(|| Error::CommandFailed(format!("lvdisplay {}", self.path())))?;
        confirm::parse_section(&output, "--- Logical volume ---")
            .ok_or_else(|| Error::NotFound(self.path()))
    }

    /// Size in `(value, unit)` form, read from the `LV Size` field.
    pub async fn get_size(&self, runner: &CommandRunner) -> Result<(f64, String)> {
        let info = self.info(runner).await?;
        let raw = info.get("LV Size").ok_or_else(|| Error::Parse("missing LV Size".to_string()))?;
        confirm::parse_size(raw).ok_or_else(|| Error::Parse(format!("unparseable LV Size: {raw}")))
    }

    pub async fn dump_to_image(&self, runner: &CommandRunner, image_path: &str) -> Result<bool> {
        let ifarg = format!("if={}", self.path());
        let ofarg = format!("of={image_path}");
        let output = runner.run("dd", &[&ifarg, &ofarg, "bs=4M"]).await;
        Ok(output.is_some())
    }

    pub async fn restore_from_image(&self, runner: &CommandRunner, image_path: &str) -> Result<bool> {
        let ifarg = format!("if={image_path}");
        let ofarg = format!("of={}", self.path());
        let output = runner.run("dd", &[&ifarg, &ofarg, "bs=4M"]).await;
        Ok(output.is_some())
    }

    pub async fn contains_snapshot(&self, runner: &CommandRunner, snapshot_name: &str) -> Result<bool> {
        let snapshots = self.get_snapshots(runner, Some(snapshot_name)).await?;
        Ok(!snapshots.is_empty())
    }

    /// Lists the snapshots of this volume, or just the one matching `name`
    /// when given. Always returns a `Vec`.
    pub async fn get_snapshots(&self, runner: &CommandRunner, name: Option<&str>) -> Result<Vec<Snapshot>> {
        let info = self.info(runner).await?;
        let mut snapshots = Vec::new();
        for candidate in &info.source_of {
            if let Some(name) = name {
                if candidate != name {
                    continue;
                }
            }
            snapshots.push(Snapshot(LogicalVolume::base(self.vg_name.clone(), candidate.clone())));
        }
        Ok(snapshots)
    }

    pub async fn create_snapshot(
        &self,
        runner: &CommandRunner,
        snapshot_name: &str,
        size: f64,
        unit: &str,
    ) -> Result<Snapshot> {
        let size_arg = format!("{size}{unit}");
        let output = runner
            .run(
                "lvcreate",
                &["--snapshot", "--name", snapshot_name, "--size", &size_arg, &self.path()],
            )
            .await
            .ok_or_else(|| Error::CommandFailed(format!("lvcreate --snapshot {snapshot_name}")))?;

        if output.contains(&confirm::lv_created(snapshot_name)) {
            Ok(Snapshot(LogicalVolume::base(self.vg_name.clone(), snapshot_name.to_string())))
        } else {
            Err(Error::CommandFailed(format!("snapshot {snapshot_name} was not confirmed created")))
        }
    }

    pub async fn remove_snapshot(&self, runner: &CommandRunner, snapshot_name: &str) -> Result<bool> {
        let target = format!("{}/{}", self.vg_name, snapshot_name);
        let output = runner
            .run("lvremove", &["--force", &target])
            .await
            .ok_or_else(|| Error::CommandFailed(format!("lvremove {target}")))?;
        Ok(output.contains(&confirm::lv_removed(snapshot_name)))
    }

    /// Reverts this volume to the state captured by `snapshot`: removes the
    /// snapshot, then recreates it immediately at the same recorded
    /// COW-table size so the origin keeps tracking new writes against a
    /// fresh snapshot of identical capacity.
    pub async fn revert_to_snapshot(&self, runner: &CommandRunner, snapshot: &Snapshot) -> Result<Snapshot> {
        let (size, unit) = snapshot.get_size(runner).await?;
        let name = snapshot.name().to_string();
        self.remove_snapshot(runner, &name).await?;
        self.create_snapshot(runner, &name, size, &unit).await
    }

    pub async fn rename_snapshot(&self, runner: &CommandRunner, snapshot_name: &str, new_name: &str) -> Result<bool> {
        let output = runner
            .run("lvrename", &[&self.vg_name, snapshot_name, new_name])
            .await
            .ok_or_else(|| Error::CommandFailed(format!("lvrename {snapshot_name} {new_name}")))?;
        Ok(output.contains(&confirm::lv_renamed(snapshot_name, new_name, &self.vg_name)))
    }
}

/// An LVM snapshot, wrapping the base `LogicalVolume` operations that still
/// apply and refusing the ones that don't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(LogicalVolume);

impl Snapshot {
    pub fn of(vg_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self(LogicalVolume::base(vg_name, name))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn volume_group(&self) -> &str {
        self.0.volume_group()
    }

    pub fn path(&self) -> String {
        self.0.path()
    }

    /// Size from the `COW-table size` field, not `LV Size`.
    pub async fn get_size(&self, runner: &CommandRunner) -> Result<(f64, String)> {
        let info = self.0.info(runner).await?;
        let raw = info
            .get("COW-table size")
            .ok_or_else(|| Error::Parse("missing COW-table size".to_string()))?;
        confirm::parse_size(raw).ok_or_else(|| Error::Parse(format!("unparseable COW-table size: {raw}")))
    }

    /// Name of the logical volume this snapshot tracks, parsed out of
    /// `LV snapshot status` ("active destination for <origin>").
    pub async fn get_parent(&self, runner: &CommandRunner) -> Result<LogicalVolume> {
        let info = self.0.info(runner).await?;
        let status = info
            .get("LV snapshot status")
            .ok_or_else(|| Error::Parse("missing LV snapshot status".to_string()))?;
        let origin = status
            .rsplit("for ")
            .next()
            .ok_or_else(|| Error::Parse(format!("unparseable LV snapshot status: {status}")))?;
        Ok(LogicalVolume::base(self.0.volume_group().to_string(), origin.trim().to_string()))
    }

    pub async fn dump_to_image(&self, runner: &CommandRunner, image_path: &str) -> Result<bool> {
        self.0.dump_to_image(runner, image_path).await
    }

    pub async fn restore_from_image(&self, runner: &CommandRunner, image_path: &str) -> Result<bool> {
        self.0.restore_from_image(runner, image_path).await
    }

    /// Snapshots cannot themselves be snapshotted.
    pub async fn get_snapshots(&self, _runner: &CommandRunner, _name: Option<&str>) -> Result<Vec<Snapshot>> {
        Err(Error::NotApplicable)
    }

    pub async fn create_snapshot(&self, _runner: &CommandRunner, _name: &str, _size: f64, _unit: &str) -> Result<Snapshot> {
        Err(Error::NotApplicable)
    }

    pub async fn remove_snapshot(&self, _runner: &CommandRunner, _name: &str) -> Result<bool> {
        Err(Error::NotApplicable)
    }

    pub async fn revert_to_snapshot(&self, _runner: &CommandRunner, _snapshot: &Snapshot) -> Result<Snapshot> {
        Err(Error::NotApplicable)
    }

    pub async fn rename_snapshot(&self, _runner: &CommandRunner, _name: &str, _new_name: &str) -> Result<bool> {
        Err(Error::NotApplicable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_volume_path_is_devmapper_style() {
        let lv = LogicalVolume::base("vg0", "base");
        assert_eq!(lv.path(), "/dev/vg0/base");
    }

    #[test]
    fn snapshot_shares_the_same_path_shape() {
        let s = Snapshot::of("vg0", "s1");
        assert_eq!(s.path(), "/dev/vg0/s1");
    }
}
