//! CRUD for the `logical_unit` resource, plus the operator actions
//! `revert`, `recreate`, `dump`, `restore`, and `get_mount_device_path`
//! (§4.5.2, §4.5.5).

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use diskctl_core::Core;
use diskctl_store::logical_units;
use diskctl_store::models::{LogicalUnit, LogicalUnitStatus};
use serde::{Deserialize, Serialize};

use crate::error::ApiErrorResponse;

fn status_str(status: LogicalUnitStatus) -> &'static str {
    match status {
        LogicalUnitStatus::Offline => "offline",
        LogicalUnitStatus::Online => "online",
        LogicalUnitStatus::Busy => "busy",
        LogicalUnitStatus::Modified => "modified",
        LogicalUnitStatus::Mounted => "mounted",
    }
}

#[derive(Debug, Serialize)]
pub struct LogicalUnitResponse {
    pub id: i64,
    pub name: String,
    pub vendor_id: String,
    pub product_id: String,
    pub product_rev: String,
    pub vg_name: String,
    pub size_gib: f64,
    pub use_flag: bool,
    pub status: String,
    pub boot_count: i64,
    pub target_id: Option<i64>,
}

impl From<LogicalUnit> for LogicalUnitResponse {
    fn from(lu: LogicalUnit) -> Self {
        Self {
            id: lu.id,
            name: lu.name,
            vendor_id: lu.vendor_id,
            product_id: lu.product_id,
            product_rev: lu.product_rev,
            vg_name: lu.vg_name,
            size_gib: lu.size_gib,
            use_flag: lu.use_flag,
            status: status_str(lu.status).to_string(),
            boot_count: lu.boot_count,
            target_id: lu.target_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogicalUnitRequest {
    pub name: String,
    pub vendor_id: String,
    pub product_id: String,
    pub product_rev: String,
    pub vg_name: String,
    pub size_gib: f64,
    #[serde(default)]
    pub use_flag: bool,
    pub target_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RevertRequest {
    #[serde(default)]
    pub snapshot: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocalFileRequest {
    pub local_file: String,
}

pub async fn list(
    State(core): State<Core>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<LogicalUnitResponse>>, ApiErrorResponse> {
    let rows = match params.get("status").and_then(|s| LogicalUnitStatus::from_query_literal(s)) {
        Some(status) => logical_units::list_by_status(&core.pool, status).await?,
        None => logical_units::list(&core.pool).await?,
    };
    Ok(Json(rows.into_iter().map(LogicalUnitResponse::from).collect()))
}

pub async fn get(State(core): State<Core>, Path(id): Path<i64>) -> Result<Json<LogicalUnitResponse>, ApiErrorResponse> {
    Ok(Json(logical_units::get(&core.pool, id).await?.into()))
}

pub async fn create(
    State(core): State<Core>,
    Json(body): Json<LogicalUnitRequest>,
) -> Result<(StatusCode, Json<LogicalUnitResponse>), ApiErrorResponse> {
    let lu = logical_units::create(
        &core.pool,
        &body.name,
        &body.vendor_id,
        &body.product_id,
        &body.product_rev,
        &body.vg_name,
        body.size_gib,
        body.use_flag,
        body.target_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(lu.into())))
}

pub async fn delete(State(core): State<Core>, Path(id): Path<i64>) -> Result<StatusCode, ApiErrorResponse> {
    logical_units::delete(&core.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn revert(
    State(core): State<Core>,
    Path(id): Path<i64>,
    Json(body): Json<RevertRequest>,
) -> Result<Json<diskctl_core::responses::ActionResponse>, ApiErrorResponse> {
    Ok(Json(diskctl_core::mutations::revert(&core, id, body.snapshot.as_deref()).await?))
}

pub async fn recreate(
    State(core): State<Core>,
    Path(id): Path<i64>,
) -> Result<Json<diskctl_core::responses::ActionResponse>, ApiErrorResponse> {
    Ok(Json(diskctl_core::mutations::recreate(&core, id).await?))
}

pub async fn dump(
    State(core): State<Core>,
    Path(id): Path<i64>,
    Json(body): Json<LocalFileRequest>,
) -> Result<(StatusCode, String), ApiErrorResponse> {
    if diskctl_core::mutations::dump(&core, id, &body.local_file).await? {
        Ok((StatusCode::OK, format!("Successfully dumped logical unit {id} to '{}'", body.local_file)))
    } else {
        Ok((StatusCode::EXPECTATION_FAILED, format!("Failed to dump logical unit {id} to '{}'", body.local_file)))
    }
}

pub async fn restore(
    State(core): State<Core>,
    Path(id): Path<i64>,
    Json(body): Json<LocalFileRequest>,
) -> Result<(StatusCode, String), ApiErrorResponse> {
    if diskctl_core::mutations::restore(&core, id, &body.local_file).await? {
        Ok((StatusCode::OK, format!("Successfully restored logical unit {id} from '{}'", body.local_file)))
    } else {
        Ok((StatusCode::EXPECTATION_FAILED, format!("Failed to restore logical unit {id} from '{}'", body.local_file)))
    }
}

pub async fn get_mount_device_path(
    State(core): State<Core>,
    Path(id): Path<i64>,
) -> Result<Json<diskctl_core::responses::DevicePathResponse>, ApiErrorResponse> {
    Ok(Json(diskctl_core::mutations::get_mount_device_path(&core, id).await?))
}
