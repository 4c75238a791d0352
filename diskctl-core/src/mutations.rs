//! Operator-initiated logical-unit actions: `revert`, `recreate`, `dump`,
//! `restore`, `get_mount_device_path`. Unlike boot/map these fail loudly
//! (§7's propagation policy).

use diskctl_store::models::LogicalUnitStatus;
use diskctl_store::{logical_units, snapshots};

use crate::attach;
use crate::device_path;
use crate::error::{Error, Result};
use crate::responses::{ActionResponse, DevicePathResponse};

/// Reverts `lu` to a snapshot: by name if `snapshot_name` names one,
/// otherwise whichever snapshot is currently active. Refuses while BUSY or
/// MOUNTED (§4.5.2).
pub async fn revert(core: &crate::Core, lu_id: i64, snapshot_name: Option<&str>) -> Result<ActionResponse> {
    let lu = logical_units::get(&core.pool, lu_id).await?;
    if matches!(lu.status, LogicalUnitStatus::Busy | LogicalUnitStatus::Mounted) {
        return Ok(ActionResponse::failure("Disk is busy or mounted, turn machine off and turn disk offline"));
    }

    let snapshot_row = match snapshot_name.filter(|name| !name.is_empty()) {
        Some(name) => snapshots::list_by_logical_unit(&core.pool, lu_id).await?.into_iter().find(|s| s.name == name),
        None => snapshots::get_active(&core.pool, lu_id).await?,
    };
    let snapshot_row = match snapshot_row {
        Some(s) => s,
        None => return Ok(ActionResponse::failure("Could not find any active snapshot to revert to")),
    };

    let group = diskctl_lvm::VolumeGroup::new(lu.vg_name.clone());
    let base = match group.get_logical_volumes(&core.runner, Some(&lu.name)).await?.into_iter().next() {
        Some(lv) => lv,
        None => return Ok(ActionResponse::failure("Logical volume not found")),
    };

    let detached = attach::detach_from_target(&core.pool, &core.runner, &lu).await?;
    let snapshot = diskctl_lvm::Snapshot::of(lu.vg_name.clone(), snapshot_row.name.clone());
    let reverted = detached && base.revert_to_snapshot(&core.runner, &snapshot).await.is_ok();

    if reverted {
        logical_units::save_lifecycle(&core.pool, lu.id, LogicalUnitStatus::Offline, lu.boot_count, lu.last_attached).await?;
        Ok(ActionResponse::success(format!("Successfully reverted to snapshot '{}'", snapshot_row.name)))
    } else {
        Ok(ActionResponse::failure(format!("Could not revert to snapshot '{}'", snapshot_row.name)))
    }
}

/// Removes and recreates `lu`'s backing logical volume at its existing
/// size, discarding its contents.
pub async fn recreate(core: &crate::Core, lu_id: i64) -> Result<ActionResponse> {
    let lu = logical_units::get(&core.pool, lu_id).await?;
    let group = diskctl_lvm::VolumeGroup::new(lu.vg_name.clone());
    let base = match group.get_logical_volumes(&core.runner, Some(&lu.name)).await?.into_iter().next() {
        Some(lv) => lv,
        None => return Ok(ActionResponse::failure("error: unable to recreate...")),
    };

    let (size, unit) = base.get_size(&core.runner).await?;
    attach::detach_from_target(&core.pool, &core.runner, &lu).await?;
    let removed = group.remove_logical_volume(&core.runner, &lu.name).await?;
    let created = removed && group.create_logical_volume(&core.runner, &lu.name, size, &unit).await?;

    if created {
        logical_units::save_lifecycle(&core.pool, lu.id, LogicalUnitStatus::Offline, lu.boot_count, lu.last_attached).await?;
        Ok(ActionResponse::success("Created..."))
    } else {
        Ok(ActionResponse::failure("error: unable to recreate..."))
    }
}

/// Dumps `lu`'s backing volume to `local_file` via `dd`. External-tool
/// failure is the caller's to surface as HTTP 417 (§7).
pub async fn dump(core: &crate::Core, lu_id: i64, local_file: &str) -> Result<bool> {
    let lu = logical_units::get(&core.pool, lu_id).await?;
    let group = diskctl_lvm::VolumeGroup::new(lu.vg_name.clone());
    let base = group
        .get_logical_volumes(&core.runner, Some(&lu.name))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(format!("logical volume {}", lu.name)))?;
    Ok(base.dump_to_image(&core.runner, local_file).await?)
}

/// Restores `lu`'s backing volume from `local_file` via `dd`.
pub async fn restore(core: &crate::Core, lu_id: i64, local_file: &str) -> Result<bool> {
    let lu = logical_units::get(&core.pool, lu_id).await?;
    let group = diskctl_lvm::VolumeGroup::new(lu.vg_name.clone());
    let base = group
        .get_logical_volumes(&core.runner, Some(&lu.name))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(format!("logical volume {}", lu.name)))?;
    Ok(base.restore_from_image(&core.runner, local_file).await?)
}

pub async fn get_mount_device_path(core: &crate::Core, lu_id: i64) -> Result<DevicePathResponse> {
    let lu = logical_units::get(&core.pool, lu_id).await?;
    match device_path::resolve(&core.pool, &core.runner, &lu).await? {
        Some(path) => Ok(DevicePathResponse {
            result: true,
            device_path: Some(path),
            message: None,
        }),
        None => Ok(DevicePathResponse {
            result: false,
            device_path: None,
            message: Some("No device found".to_string()),
        }),
    }
}
