//! `get_boot_disk_info` (§4.5.3): the automatic boot-disk negotiation run on
//! every PXE/iPXE boot attempt against a Target.

use chrono::Utc;
use diskctl_store::models::LogicalUnitStatus;
use diskctl_store::{initiators, logical_units, snapshots, targets};

use crate::attach;
use crate::lifecycle::select_next_boot_candidate;
use crate::responses::BootResponse;
use crate::{Core, Result};

pub async fn get_boot_disk_info(core: &Core, target_id: i64) -> Result<BootResponse> {
    let _guard = core.locks.acquire(target_id).await?;

    let target = match targets::get(&core.pool, target_id).await {
        Ok(target) => target,
        Err(diskctl_store::Error::NotFound { .. }) => return Ok(BootResponse::failure("target not found")),
        Err(e) => return Err(e.into()),
    };
    let initiator = match target.initiator_id {
        Some(id) => initiators::get(&core.pool, id).await?,
        None => return Ok(BootResponse::failure("target has no initiator bound")),
    };

    // Step 1: ensure the iSCSI target exists.
    let iscsi_target = diskctl_tgt::Target::new(target.id as u32, target.name.clone());
    if !iscsi_target.exists(&core.runner).await? {
        iscsi_target.add(&core.runner).await?;
    }

    // Step 2: bind by address.
    let tgt_initiator =
        diskctl_tgt::Initiator::new(initiator.ip_address.clone().unwrap_or_default(), initiator.name.clone());
    iscsi_target.bind_to_initiator(&core.runner, Some(&tgt_initiator), "address").await?;

    // Step 3: rebuild the attach set from scratch.
    iscsi_target.detach_all_logical_units(&core.runner).await?;

    // Step 4: close stale sessions held by this initiator.
    iscsi_target.close_initiator_connections(&core.runner, &tgt_initiator).await?;

    // Step 5: compute the next boot disk.
    let busy = logical_units::list_by_target(&core.pool, target.id)
        .await?
        .into_iter()
        .find(|lu| lu.status == LogicalUnitStatus::Busy);

    let mut reconciled_busy_holder = false;
    if let Some(busy_lu) = &busy {
        let has_active_snapshot = snapshots::get_active(&core.pool, busy_lu.id).await?.is_some();
        if busy_lu.boot_count <= 0 && has_active_snapshot {
            logical_units::save_lifecycle(&core.pool, busy_lu.id, LogicalUnitStatus::Modified, busy_lu.boot_count, busy_lu.last_attached)
                .await?;
            attach::detach_from_target(&core.pool, &core.runner, busy_lu).await?;
            reconciled_busy_holder = true;
        } else if busy_lu.boot_count <= 0 {
            // Previous holder returned with no active snapshot: release it back to ONLINE.
            // It stays attached, so no detach here.
            logical_units::save_lifecycle(&core.pool, busy_lu.id, LogicalUnitStatus::Online, busy_lu.boot_count, busy_lu.last_attached)
                .await?;
            reconciled_busy_holder = true;
        }
    }

    let chosen = if busy.is_none() || reconciled_busy_holder {
        let online: Vec<_> = logical_units::list_by_target(&core.pool, target.id)
            .await?
            .into_iter()
            .filter(|lu| lu.status == LogicalUnitStatus::Online)
            .collect();
        select_next_boot_candidate(&online).cloned()
    } else {
        busy
    };

    let chosen = match chosen {
        Some(lu) => lu,
        // Step 6.
        None => return Ok(BootResponse::failure("No logical unit found for booting")),
    };

    // Step 7.
    if !attach::attach_to_target(&core.pool, &core.runner, &chosen).await? {
        return Ok(BootResponse::failure("Unable to attach logical unit to target"));
    }

    // Step 8.
    let boot_count = if chosen.boot_count > 0 { chosen.boot_count - 1 } else { chosen.boot_count };
    logical_units::save_lifecycle(&core.pool, chosen.id, LogicalUnitStatus::Busy, boot_count, Some(Utc::now())).await?;

    // Step 9.
    initiators::touch_last_initiated(&core.pool, initiator.id, Utc::now()).await?;

    // Step 10.
    Ok(BootResponse::success(chosen.id, iscsi_target.iqn()))
}
