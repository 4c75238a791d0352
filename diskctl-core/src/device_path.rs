//! Device path resolution (§4.5.1).

use diskctl_runner::CommandRunner;
use diskctl_store::models::{LogicalUnit, Snapshot};
use sqlx::SqlitePool;

use crate::error::Result;

/// Resolves the path an initiator should see for `lu`:
/// - no path if the base LV is missing,
/// - the active snapshot's path if one exists,
/// - nothing if snapshots exist but none is active (forces an operator
///   decision before the LU is bootable again),
/// - otherwise the base LV path.
pub async fn resolve(pool: &SqlitePool, runner: &CommandRunner, lu: &LogicalUnit) -> Result<Option<String>> {
    let group = diskctl_lvm::VolumeGroup::new(lu.vg_name.clone());
    let base_lvs = group.get_logical_volumes(runner, Some(&lu.name)).await?;
    let base_path = base_lvs.first().map(|lv| lv.path());

    let snapshots = diskctl_store::snapshots::list_by_logical_unit(pool, lu.id).await?;
    Ok(pick_path(base_path.as_deref(), &lu.vg_name, &snapshots))
}

/// The decision in step 2 of §4.5.1, factored out of [`resolve`] so it can
/// be tested without a live LVM install.
fn pick_path(base_path: Option<&str>, vg_name: &str, snapshots: &[Snapshot]) -> Option<String> {
    base_path?;
    if let Some(active) = snapshots.iter().find(|s| s.active) {
        return Some(diskctl_lvm::Snapshot::of(vg_name, active.name.clone()).path());
    }
    if !snapshots.is_empty() {
        return None;
    }
    base_path.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskctl_store::models::Snapshot;

    fn snap(name: &str, active: bool, lu_id: i64) -> Snapshot {
        Snapshot {
            id: 1,
            name: name.to_string(),
            size_gib: 2.0,
            active,
            description: String::new(),
            logical_unit_id: lu_id,
        }
    }

    #[test]
    fn missing_base_volume_yields_no_path_regardless_of_snapshots() {
        assert_eq!(pick_path(None, "vg0", &[snap("s1", true, 1)]), None);
    }

    #[test]
    fn no_snapshots_returns_the_base_path() {
        assert_eq!(pick_path(Some("/dev/vg0/base"), "vg0", &[]), Some("/dev/vg0/base".to_string()));
    }

    #[test]
    fn an_active_snapshot_overrides_the_base_path() {
        let snapshots = vec![snap("s1", false, 1), snap("s2", true, 1)];
        assert_eq!(pick_path(Some("/dev/vg0/base"), "vg0", &snapshots), Some("/dev/vg0/s2".to_string()));
    }

    #[test]
    fn snapshots_exist_but_none_active_yields_no_path() {
        let snapshots = vec![snap("s1", false, 1)];
        assert_eq!(pick_path(Some("/dev/vg0/base"), "vg0", &snapshots), None);
    }
}
