//! Attaching/detaching one LogicalUnit from its owning Target, the shared
//! building block `boot`, `map`, `attach_all` and the revert/recreate
//! mutations are all built on.

use diskctl_runner::CommandRunner;
use diskctl_store::models::LogicalUnit;
use sqlx::SqlitePool;

use crate::device_path;
use crate::error::{Error, Result};

fn target_driver(target: &diskctl_store::models::Target) -> diskctl_tgt::Target {
    diskctl_tgt::Target::new(target.id as u32, target.name.clone())
}

/// Attaches `lu` to its target at LUN id = `lu.id`, backed by its resolved
/// device path, and pushes its SCSI vendor/product identity.
pub async fn attach_to_target(pool: &SqlitePool, runner: &CommandRunner, lu: &LogicalUnit) -> Result<bool> {
    let target_id = match lu.target_id {
        Some(id) => id,
        None => return Err(Error::Conflict(format!("logical unit {} has no target", lu.id))),
    };
    let target = diskctl_store::targets::get(pool, target_id).await?;
    let iscsi_target = target_driver(&target);
    if !iscsi_target.exists(runner).await? {
        iscsi_target.add(runner).await?;
    }

    let path = match device_path::resolve(pool, runner, lu).await? {
        Some(path) => path,
        None => return Ok(false),
    };

    if !iscsi_target.attach_logical_unit(runner, &path, lu.id as u32).await? {
        return Ok(false);
    }
    Ok(iscsi_target
        .update_logical_unit_params(runner, lu.id as u32, Some(&lu.vendor_id), Some(&lu.product_id), Some(&lu.product_rev))
        .await?)
}

/// Detaches `lu` from its target, if it has one and the target exists.
/// No-op (and `Ok(true)`) when there is nothing to detach.
pub async fn detach_from_target(pool: &SqlitePool, runner: &CommandRunner, lu: &LogicalUnit) -> Result<bool> {
    let target_id = match lu.target_id {
        Some(id) => id,
        None => return Ok(true),
    };
    let target = diskctl_store::targets::get(pool, target_id).await?;
    let iscsi_target = target_driver(&target);
    if !iscsi_target.exists(runner).await? {
        return Ok(true);
    }
    Ok(iscsi_target.detach_logical_unit(runner, lu.id as u32).await?)
}
