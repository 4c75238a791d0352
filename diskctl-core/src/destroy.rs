//! Target destruction (§4.5.5). Operator-initiated, fails loudly.

use diskctl_store::targets;

use crate::{Core, Result};

pub async fn destroy_target(core: &Core, target_id: i64) -> Result<()> {
    let target = targets::get(&core.pool, target_id).await?;
    let iscsi_target = diskctl_tgt::Target::new(target.id as u32, target.name.clone());
    if iscsi_target.exists(&core.runner).await? {
        iscsi_target.close_all_connections(&core.runner).await?;
        iscsi_target.detach_all_logical_units(&core.runner).await?;
        iscsi_target.remove(&core.runner).await?;
    }
    targets::delete(&core.pool, target.id).await?;
    Ok(())
}
