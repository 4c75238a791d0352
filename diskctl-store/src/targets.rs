//! Target repository.

use sqlx::{Row, SqlitePool};

use crate::error::{Error, Result};
use crate::models::{Target, TargetStatus};

fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Target> {
    let status_raw: String = row.try_get("status")?;
    let status = TargetStatus::from_query_literal(&status_raw).ok_or(Error::InvalidValue {
        field: "status",
        value: status_raw,
    })?;
    Ok(Target {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        boot: row.try_get("boot")?,
        active: row.try_get("active")?,
        status,
        initiator_id: row.try_get("initiator_id")?,
    })
}

const COLUMNS: &str = "id, name, boot, active, status, initiator_id";

pub async fn create(pool: &SqlitePool, name: &str, boot: bool, active: bool, initiator_id: Option<i64>) -> Result<Target> {
    let sql = format!(
        "INSERT INTO targets (name, boot, active, status, initiator_id) VALUES (?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    );
    let row = sqlx::query(sqlx::AssertSqlSafe(sql))
        .bind(name)
        .bind(boot)
        .bind(active)
        .bind(TargetStatus::Offline.as_str())
        .bind(initiator_id)
        .fetch_one(pool)
        .await?;
    from_row(&row)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Target> {
    let sql = format!("SELECT {COLUMNS} FROM targets WHERE id = ?");
    let row = sqlx::query(sqlx::AssertSqlSafe(sql))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(Error::NotFound { entity: "target", id })?;
    from_row(&row)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Target>> {
    let sql = format!("SELECT {COLUMNS} FROM targets ORDER BY id");
    let rows = sqlx::query(sqlx::AssertSqlSafe(sql)).fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

/// Targets reachable by `initiator.mac_address`, joining through the
/// initiator table (`?mac_address=` query filter from §4.6).
pub async fn list_by_initiator_mac(pool: &SqlitePool, mac_address: &str) -> Result<Vec<Target>> {
    let sql = "SELECT t.id, t.name, t.boot, t.active, t.status, t.initiator_id FROM targets t \
         JOIN initiators i ON i.id = t.initiator_id WHERE i.mac_address = ? ORDER BY t.id";
    let rows = sqlx::query(sql).bind(mac_address).fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

pub async fn set_status(pool: &SqlitePool, id: i64, status: TargetStatus) -> Result<()> {
    let result = sqlx::query("UPDATE targets SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound { entity: "target", id });
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM targets WHERE id = ?").bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound { entity: "target", id });
    }
    Ok(())
}
