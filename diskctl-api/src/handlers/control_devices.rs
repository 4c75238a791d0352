//! CRUD for `pdu` and `kvm` resources, which share the same column shape
//! (§3.1) and so share this one handler set parameterized by
//! [`ControlDeviceKind`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use diskctl_core::Core;
use diskctl_store::control_devices;
use diskctl_store::models::{ControlDevice, ControlDeviceKind};
use serde::{Deserialize, Serialize};

use crate::error::ApiErrorResponse;

#[derive(Debug, Serialize)]
pub struct ControlDeviceResponse {
    pub id: i64,
    pub name: String,
    pub ip_address: String,
    pub mac_address: Option<String>,
    pub total_ports: i64,
    pub model: String,
    pub serial: String,
    pub username: String,
    pub password: String,
}

impl From<ControlDevice> for ControlDeviceResponse {
    fn from(d: ControlDevice) -> Self {
        Self {
            id: d.id,
            name: d.name,
            ip_address: d.ip_address,
            mac_address: d.mac_address,
            total_ports: d.total_ports,
            model: d.model,
            serial: d.serial,
            username: d.username,
            password: d.password,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ControlDeviceRequest {
    pub name: String,
    pub ip_address: String,
    pub mac_address: Option<String>,
    pub total_ports: i64,
    pub model: String,
    pub serial: String,
    pub username: String,
    pub password: String,
}

async fn list(core: &Core, kind: ControlDeviceKind) -> Result<Json<Vec<ControlDeviceResponse>>, ApiErrorResponse> {
    let devices = control_devices::list(&core.pool, kind).await?;
    Ok(Json(devices.into_iter().map(ControlDeviceResponse::from).collect()))
}

async fn get(core: &Core, kind: ControlDeviceKind, id: i64) -> Result<Json<ControlDeviceResponse>, ApiErrorResponse> {
    Ok(Json(control_devices::get(&core.pool, kind, id).await?.into()))
}

async fn create(
    core: &Core,
    kind: ControlDeviceKind,
    body: ControlDeviceRequest,
) -> Result<(StatusCode, Json<ControlDeviceResponse>), ApiErrorResponse> {
    let device = control_devices::create(
        &core.pool,
        kind,
        &body.name,
        &body.ip_address,
        body.mac_address.as_deref(),
        body.total_ports,
        &body.model,
        &body.serial,
        &body.username,
        &body.password,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(device.into())))
}

async fn delete(core: &Core, kind: ControlDeviceKind, id: i64) -> Result<StatusCode, ApiErrorResponse> {
    control_devices::delete(&core.pool, kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_pdus(State(core): State<Core>) -> Result<Json<Vec<ControlDeviceResponse>>, ApiErrorResponse> {
    list(&core, ControlDeviceKind::Pdu).await
}

pub async fn get_pdu(State(core): State<Core>, Path(id): Path<i64>) -> Result<Json<ControlDeviceResponse>, ApiErrorResponse> {
    get(&core, ControlDeviceKind::Pdu, id).await
}

pub async fn create_pdu(
    State(core): State<Core>,
    Json(body): Json<ControlDeviceRequest>,
) -> Result<(StatusCode, Json<ControlDeviceResponse>), ApiErrorResponse> {
    create(&core, ControlDeviceKind::Pdu, body).await
}

pub async fn delete_pdu(State(core): State<Core>, Path(id): Path<i64>) -> Result<StatusCode, ApiErrorResponse> {
    delete(&core, ControlDeviceKind::Pdu, id).await
}

pub async fn list_kvms(State(core): State<Core>) -> Result<Json<Vec<ControlDeviceResponse>>, ApiErrorResponse> {
    list(&core, ControlDeviceKind::Kvm).await
}

pub async fn get_kvm(State(core): State<Core>, Path(id): Path<i64>) -> Result<Json<ControlDeviceResponse>, ApiErrorResponse> {
    get(&core, ControlDeviceKind::Kvm, id).await
}

pub async fn create_kvm(
    State(core): State<Core>,
    Json(body): Json<ControlDeviceRequest>,
) -> Result<(StatusCode, Json<ControlDeviceResponse>), ApiErrorResponse> {
    create(&core, ControlDeviceKind::Kvm, body).await
}

pub async fn delete_kvm(State(core): State<Core>, Path(id): Path<i64>) -> Result<StatusCode, ApiErrorResponse> {
    delete(&core, ControlDeviceKind::Kvm, id).await
}
