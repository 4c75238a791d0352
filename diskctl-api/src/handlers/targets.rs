//! CRUD for the `target` resource, plus the `get_boot_disk_info` and
//! `get_map_disk_info` actions (§4.5.3, §4.5.4).

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use diskctl_core::Core;
use diskctl_store::models::Target;
use diskctl_store::targets;
use serde::{Deserialize, Serialize};

use crate::error::ApiErrorResponse;

#[derive(Debug, Serialize)]
pub struct TargetResponse {
    pub id: i64,
    pub name: String,
    pub boot: bool,
    pub active: bool,
    pub status: String,
    pub initiator_id: Option<i64>,
}

impl From<Target> for TargetResponse {
    fn from(t: Target) -> Self {
        Self {
            id: t.id,
            name: t.name,
            boot: t.boot,
            active: t.active,
            status: t.status.as_str().to_string(),
            initiator_id: t.initiator_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    pub name: String,
    #[serde(default)]
    pub boot: bool,
    #[serde(default)]
    pub active: bool,
    pub initiator_id: Option<i64>,
}

pub async fn list(
    State(core): State<Core>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<TargetResponse>>, ApiErrorResponse> {
    let rows = match params.get("mac_address") {
        Some(mac) => targets::list_by_initiator_mac(&core.pool, mac).await?,
        None => targets::list(&core.pool).await?,
    };
    Ok(Json(rows.into_iter().map(TargetResponse::from).collect()))
}

pub async fn get(State(core): State<Core>, Path(id): Path<i64>) -> Result<Json<TargetResponse>, ApiErrorResponse> {
    Ok(Json(targets::get(&core.pool, id).await?.into()))
}

pub async fn create(
    State(core): State<Core>,
    Json(body): Json<TargetRequest>,
) -> Result<(StatusCode, Json<TargetResponse>), ApiErrorResponse> {
    let target = targets::create(&core.pool, &body.name, body.boot, body.active, body.initiator_id).await?;
    Ok((StatusCode::CREATED, Json(target.into())))
}

pub async fn destroy(State(core): State<Core>, Path(id): Path<i64>) -> Result<StatusCode, ApiErrorResponse> {
    diskctl_core::destroy::destroy_target(&core, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_boot_disk_info(State(core): State<Core>, Path(id): Path<i64>) -> Result<Json<diskctl_core::responses::BootResponse>, ApiErrorResponse> {
    Ok(Json(diskctl_core::boot::get_boot_disk_info(&core, id).await?))
}

pub async fn get_map_disk_info(State(core): State<Core>, Path(id): Path<i64>) -> Result<Json<diskctl_core::responses::MapResponse>, ApiErrorResponse> {
    Ok(Json(diskctl_core::map::get_map_disk_info(&core, id).await?))
}

pub async fn attach_all_usable_logical_units(State(core): State<Core>, Path(id): Path<i64>) -> Result<StatusCode, ApiErrorResponse> {
    diskctl_core::attach_all::attach_all_usable_logical_units(&core, id).await?;
    Ok(StatusCode::OK)
}
