//! `get_map_disk_info` (§4.5.4): attaches a MODIFIED disk back to the
//! control host so an operator can inspect the changes an initiator made.

use diskctl_store::models::LogicalUnitStatus;
use diskctl_store::{initiators, logical_units, targets};

use crate::device_path;
use crate::responses::MapResponse;
use crate::{Core, Result};

pub async fn get_map_disk_info(core: &Core, target_id: i64) -> Result<MapResponse> {
    let _guard = core.locks.acquire(target_id).await?;

    let target = match targets::get(&core.pool, target_id).await {
        Ok(target) => target,
        Err(diskctl_store::Error::NotFound { .. }) => return Ok(MapResponse::failure("target not found")),
        Err(e) => return Err(e.into()),
    };

    // Step 1: ensure target exists, bind by address.
    let iscsi_target = diskctl_tgt::Target::new(target.id as u32, target.name.clone());
    if !iscsi_target.exists(&core.runner).await? {
        iscsi_target.add(&core.runner).await?;
    }
    if let Some(initiator_id) = target.initiator_id {
        let initiator = initiators::get(&core.pool, initiator_id).await?;
        let tgt_initiator =
            diskctl_tgt::Initiator::new(initiator.ip_address.clone().unwrap_or_default(), initiator.name.clone());
        iscsi_target.bind_to_initiator(&core.runner, Some(&tgt_initiator), "address").await?;
    }

    // Step 2.
    let modified = logical_units::list_by_target(&core.pool, target.id)
        .await?
        .into_iter()
        .find(|lu| lu.status == LogicalUnitStatus::Modified);
    let chosen = match modified {
        Some(lu) => lu,
        None => return Ok(MapResponse::failure("No logical unit found for mapping")),
    };

    // Step 3.
    let path = match device_path::resolve(&core.pool, &core.runner, &chosen).await? {
        Some(path) => path,
        None => return Ok(MapResponse::failure("No logical volume path was discovered")),
    };
    let lun_id = iscsi_target.get_logical_unit_number(&core.runner, &path).await?;
    if lun_id.map(i64::from) != Some(chosen.id) {
        return Ok(MapResponse::failure("No target online or online with different id"));
    }

    // Step 4.
    logical_units::save_lifecycle(&core.pool, chosen.id, LogicalUnitStatus::Mounted, chosen.boot_count, chosen.last_attached).await?;
    Ok(MapResponse::success(chosen.id, iscsi_target.iqn()))
}
