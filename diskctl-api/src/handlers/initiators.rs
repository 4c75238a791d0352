//! CRUD for the `initiator` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::{DateTime, Utc};
use diskctl_core::Core;
use diskctl_store::initiators;
use diskctl_store::models::{Initiator, InitiatorMode};
use serde::{Deserialize, Serialize};

use crate::error::ApiErrorResponse;

#[derive(Debug, Serialize)]
pub struct InitiatorResponse {
    pub id: i64,
    pub mac_address: String,
    pub name: String,
    pub mode: String,
    pub ip_address: Option<String>,
    pub pdu_id: Option<i64>,
    pub pdu_port: Option<i64>,
    pub kvm_id: Option<i64>,
    pub kvm_port: Option<i64>,
    pub last_initiated: Option<DateTime<Utc>>,
}

impl From<Initiator> for InitiatorResponse {
    fn from(i: Initiator) -> Self {
        Self {
            id: i.id,
            mac_address: i.mac_address,
            name: i.name,
            mode: i.mode.as_str().to_string(),
            ip_address: i.ip_address,
            pdu_id: i.pdu_id,
            pdu_port: i.pdu_port,
            kvm_id: i.kvm_id,
            kvm_port: i.kvm_port,
            last_initiated: i.last_initiated,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InitiatorRequest {
    pub mac_address: String,
    pub name: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    pub ip_address: Option<String>,
    pub pdu_id: Option<i64>,
    pub pdu_port: Option<i64>,
    pub kvm_id: Option<i64>,
    pub kvm_port: Option<i64>,
}

fn default_mode() -> String {
    "A".to_string()
}

pub async fn list(State(core): State<Core>) -> Result<Json<Vec<InitiatorResponse>>, ApiErrorResponse> {
    let rows = initiators::list(&core.pool).await?;
    Ok(Json(rows.into_iter().map(InitiatorResponse::from).collect()))
}

pub async fn get(State(core): State<Core>, Path(id): Path<i64>) -> Result<Json<InitiatorResponse>, ApiErrorResponse> {
    Ok(Json(initiators::get(&core.pool, id).await?.into()))
}

pub async fn create(
    State(core): State<Core>,
    Json(body): Json<InitiatorRequest>,
) -> Result<(StatusCode, Json<InitiatorResponse>), ApiErrorResponse> {
    let mode = InitiatorMode::from_query_literal(&body.mode).unwrap_or(InitiatorMode::Automatic);
    let initiator = initiators::create(
        &core.pool,
        &body.mac_address,
        &body.name,
        mode,
        body.ip_address.as_deref(),
        body.pdu_id,
        body.pdu_port,
        body.kvm_id,
        body.kvm_port,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(initiator.into())))
}

pub async fn delete(State(core): State<Core>, Path(id): Path<i64>) -> Result<StatusCode, ApiErrorResponse> {
    initiators::delete(&core.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
