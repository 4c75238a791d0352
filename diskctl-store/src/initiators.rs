//! Initiator repository.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::error::{Error, Result};
use crate::models::{Initiator, InitiatorMode};

fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Initiator> {
    let mode_raw: String = row.try_get("mode")?;
    let mode = InitiatorMode::from_query_literal(&mode_raw).ok_or(Error::InvalidValue {
        field: "mode",
        value: mode_raw,
    })?;
    Ok(Initiator {
        id: row.try_get("id")?,
        mac_address: row.try_get("mac_address")?,
        name: row.try_get("name")?,
        mode,
        ip_address: row.try_get("ip_address")?,
        pdu_id: row.try_get("pdu_id")?,
        pdu_port: row.try_get("pdu_port")?,
        kvm_id: row.try_get("kvm_id")?,
        kvm_port: row.try_get("kvm_port")?,
        last_initiated: row.try_get("last_initiated")?,
    })
}

const COLUMNS: &str = "id, mac_address, name, mode, ip_address, pdu_id, pdu_port, kvm_id, kvm_port, last_initiated";

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &SqlitePool,
    mac_address: &str,
    name: &str,
    mode: InitiatorMode,
    ip_address: Option<&str>,
    pdu_id: Option<i64>,
    pdu_port: Option<i64>,
    kvm_id: Option<i64>,
    kvm_port: Option<i64>,
) -> Result<Initiator> {
    let sql = format!(
        "INSERT INTO initiators (mac_address, name, mode, ip_address, pdu_id, pdu_port, kvm_id, kvm_port) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    );
    let row = sqlx::query(sqlx::AssertSqlSafe(sql))
        .bind(mac_address)
        .bind(name)
        .bind(mode.as_str())
        .bind(ip_address)
        .bind(pdu_id)
        .bind(pdu_port)
        .bind(kvm_id)
        .bind(kvm_port)
        .fetch_one(pool)
        .await?;
    from_row(&row)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Initiator> {
    let sql = format!("SELECT {COLUMNS} FROM initiators WHERE id = ?");
    let row = sqlx::query(sqlx::AssertSqlSafe(sql))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(Error::NotFound { entity: "initiator", id })?;
    from_row(&row)
}

pub async fn get_by_mac_address(pool: &SqlitePool, mac_address: &str) -> Result<Option<Initiator>> {
    let sql = format!("SELECT {COLUMNS} FROM initiators WHERE mac_address = ?");
    let row = sqlx::query(sqlx::AssertSqlSafe(sql)).bind(mac_address).fetch_optional(pool).await?;
    row.as_ref().map(from_row).transpose()
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Initiator>> {
    let sql = format!("SELECT {COLUMNS} FROM initiators ORDER BY id");
    let rows = sqlx::query(sqlx::AssertSqlSafe(sql)).fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

pub async fn touch_last_initiated(pool: &SqlitePool, id: i64, at: DateTime<Utc>) -> Result<()> {
    let result = sqlx::query("UPDATE initiators SET last_initiated = ? WHERE id = ?")
        .bind(at)
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound { entity: "initiator", id });
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM initiators WHERE id = ?").bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound { entity: "initiator", id });
    }
    Ok(())
}
