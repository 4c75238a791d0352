//! CRUD for the `snapshot` resource. Creation and destruction both require
//! the owning logical unit to be OFFLINE and detach it from its target
//! first, matching the original `SnapshotViewSet` behavior.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use diskctl_core::Core;
use diskctl_store::models::{LogicalUnitStatus, Snapshot};
use diskctl_store::{logical_units, snapshots};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiErrorResponse};

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub id: i64,
    pub name: String,
    pub size_gib: f64,
    pub active: bool,
    pub description: String,
    pub logical_unit_id: i64,
}

impl From<Snapshot> for SnapshotResponse {
    fn from(s: Snapshot) -> Self {
        Self {
            id: s.id,
            name: s.name,
            size_gib: s.size_gib,
            active: s.active,
            description: s.description,
            logical_unit_id: s.logical_unit_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SnapshotRequest {
    pub name: String,
    pub logical_unit_id: i64,
    #[serde(default = "default_size_gib")]
    pub size_gib: f64,
    #[serde(default)]
    pub description: String,
}

fn default_size_gib() -> f64 {
    5.0
}

fn must_be_offline(status: LogicalUnitStatus) -> Result<(), ApiErrorResponse> {
    if status != LogicalUnitStatus::Offline {
        return Err(ApiErrorResponse::from_parts(
            StatusCode::BAD_REQUEST,
            ApiError::new("invalid_request", "Logical unit must be offline and its initiator machine must also be turned off"),
        ));
    }
    Ok(())
}

pub async fn list(State(core): State<Core>, Path(lu_id): Path<i64>) -> Result<Json<Vec<SnapshotResponse>>, ApiErrorResponse> {
    let rows = snapshots::list_by_logical_unit(&core.pool, lu_id).await?;
    Ok(Json(rows.into_iter().map(SnapshotResponse::from).collect()))
}

pub async fn get(State(core): State<Core>, Path(id): Path<i64>) -> Result<Json<SnapshotResponse>, ApiErrorResponse> {
    Ok(Json(snapshots::get(&core.pool, id).await?.into()))
}

pub async fn create(
    State(core): State<Core>,
    Json(body): Json<SnapshotRequest>,
) -> Result<(StatusCode, Json<SnapshotResponse>), ApiErrorResponse> {
    let lu = logical_units::get(&core.pool, body.logical_unit_id).await?;
    must_be_offline(lu.status)?;

    diskctl_core::attach::detach_from_target(&core.pool, &core.runner, &lu).await?;

    let group = diskctl_lvm::VolumeGroup::new(lu.vg_name.clone());
    let base = group
        .get_logical_volumes(&core.runner, Some(&lu.name))
        .await
        .map_err(diskctl_core::Error::from)?
        .into_iter()
        .next();

    let created = match &base {
        Some(lv) => {
            !lv.contains_snapshot(&core.runner, &body.name).await.map_err(diskctl_core::Error::from)?
                && lv
                    .create_snapshot(&core.runner, &body.name, body.size_gib, "g")
                    .await
                    .map(|_| true)
                    .map_err(diskctl_core::Error::from)?
        }
        None => false,
    };
    if !created {
        return Err(ApiErrorResponse::from_parts(
            StatusCode::EXPECTATION_FAILED,
            ApiError::new("external_command_failed", "Resource could not be created"),
        ));
    }

    let snapshot = snapshots::create(&core.pool, &body.name, body.size_gib, &body.description, lu.id).await?;
    Ok((StatusCode::CREATED, Json(snapshot.into())))
}

/// Marks this snapshot active (and, transitively, its logical unit's
/// device path — §4.5.1 step 2), deactivating any sibling snapshot first.
pub async fn activate(State(core): State<Core>, Path(id): Path<i64>) -> Result<Json<SnapshotResponse>, ApiErrorResponse> {
    snapshots::activate(&core.pool, id).await?;
    Ok(Json(snapshots::get(&core.pool, id).await?.into()))
}

pub async fn delete(State(core): State<Core>, Path(id): Path<i64>) -> Result<StatusCode, ApiErrorResponse> {
    let snapshot = snapshots::get(&core.pool, id).await?;
    let lu = logical_units::get(&core.pool, snapshot.logical_unit_id).await?;
    must_be_offline(lu.status)?;

    diskctl_core::attach::detach_from_target(&core.pool, &core.runner, &lu).await?;

    let group = diskctl_lvm::VolumeGroup::new(lu.vg_name.clone());
    if let Some(lv) = group.get_logical_volumes(&core.runner, Some(&lu.name)).await.map_err(diskctl_core::Error::from)?.into_iter().next() {
        lv.remove_snapshot(&core.runner, &snapshot.name).await.map_err(diskctl_core::Error::from)?;
    }

    snapshots::delete(&core.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
