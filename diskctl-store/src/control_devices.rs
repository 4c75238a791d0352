//! PDU / KVM repositories. The two tables share an identical column shape
//! (see [`models::ControlDeviceKind`]), so the query bodies are shared and
//! only the table name varies.

use sqlx::{Row, SqlitePool};

use crate::error::{Error, Result};
use crate::models::{ControlDevice, ControlDeviceKind};

fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ControlDevice> {
    Ok(ControlDevice {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        ip_address: row.try_get("ip_address")?,
        mac_address: row.try_get("mac_address")?,
        total_ports: row.try_get("total_ports")?,
        model: row.try_get("model")?,
        serial: row.try_get("serial")?,
        username: row.try_get("username")?,
        password: row.try_get("password")?,
    })
}

/// The total-port/outlet column is named differently per table
/// (`total_outlets` for PDUs, `total_ports` for KVMs); callers always see it
/// through [`ControlDevice::total_ports`].
fn port_column(kind: ControlDeviceKind) -> &'static str {
    match kind {
        ControlDeviceKind::Pdu => "total_outlets",
        ControlDeviceKind::Kvm => "total_ports",
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &SqlitePool,
    kind: ControlDeviceKind,
    name: &str,
    ip_address: &str,
    mac_address: Option<&str>,
    total_ports: i64,
    model: &str,
    serial: &str,
    username: &str,
    password: &str,
) -> Result<ControlDevice> {
    let sql = format!(
        "INSERT INTO {} (name, ip_address, mac_address, {}, model, serial, username, password) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id, name, ip_address, mac_address, {} AS total_ports, model, serial, username, password",
        kind.table(),
        port_column(kind),
        port_column(kind),
    );
    let row = sqlx::query(sqlx::AssertSqlSafe(sql))
        .bind(name)
        .bind(ip_address)
        .bind(mac_address)
        .bind(total_ports)
        .bind(model)
        .bind(serial)
        .bind(username)
        .bind(password)
        .fetch_one(pool)
        .await?;
    from_row(&row)
}

pub async fn get(pool: &SqlitePool, kind: ControlDeviceKind, id: i64) -> Result<ControlDevice> {
    let sql = format!(
        "SELECT id, name, ip_address, mac_address, {} AS total_ports, model, serial, username, password FROM {} WHERE id = ?",
        port_column(kind),
        kind.table(),
    );
    let row = sqlx::query(sqlx::AssertSqlSafe(sql))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(Error::NotFound { entity: kind.table(), id })?;
    from_row(&row)
}

pub async fn list(pool: &SqlitePool, kind: ControlDeviceKind) -> Result<Vec<ControlDevice>> {
    let sql = format!(
        "SELECT id, name, ip_address, mac_address, {} AS total_ports, model, serial, username, password FROM {} ORDER BY id",
        port_column(kind),
        kind.table(),
    );
    let rows = sqlx::query(sqlx::AssertSqlSafe(sql)).fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

pub async fn delete(pool: &SqlitePool, kind: ControlDeviceKind, id: i64) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?", kind.table());
    let result = sqlx::query(sqlx::AssertSqlSafe(sql)).bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound { entity: kind.table(), id });
    }
    Ok(())
}
