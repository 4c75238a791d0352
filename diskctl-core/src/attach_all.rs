//! `attach_all_usable_logical_units` (§4.5.2): brings every eligible
//! OFFLINE logical unit under a Target up to ONLINE.

use diskctl_store::models::LogicalUnitStatus;
use diskctl_store::logical_units;

use crate::attach;
use crate::{Core, Result};

pub async fn attach_all_usable_logical_units(core: &Core, target_id: i64) -> Result<()> {
    let units = logical_units::list_by_target(&core.pool, target_id).await?;
    for lu in units.into_iter().filter(|lu| lu.status == LogicalUnitStatus::Offline && lu.use_flag) {
        attach::detach_from_target(&core.pool, &core.runner, &lu).await?;
        attach::attach_to_target(&core.pool, &core.runner, &lu).await?;
        logical_units::save_lifecycle(&core.pool, lu.id, LogicalUnitStatus::Online, lu.boot_count, lu.last_attached).await?;
    }
    Ok(())
}
