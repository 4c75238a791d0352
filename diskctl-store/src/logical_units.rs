//! LogicalUnit repository.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::error::{Error, Result};
use crate::models::{LogicalUnit, LogicalUnitStatus};

fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<LogicalUnit> {
    let status_raw: i64 = row.try_get("status")?;
    let status = LogicalUnitStatus::from_i64(status_raw).ok_or(Error::InvalidValue {
        field: "status",
        value: status_raw.to_string(),
    })?;
    Ok(LogicalUnit {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        vendor_id: row.try_get("vendor_id")?,
        product_id: row.try_get("product_id")?,
        product_rev: row.try_get("product_rev")?,
        vg_name: row.try_get("vg_name")?,
        size_gib: row.try_get("size_gib")?,
        use_flag: row.try_get("use_flag")?,
        status,
        boot_count: row.try_get("boot_count")?,
        last_attached: row.try_get("last_attached")?,
        target_id: row.try_get("target_id")?,
    })
}

const COLUMNS: &str =
    "id, name, vendor_id, product_id, product_rev, vg_name, size_gib, use_flag, status, boot_count, last_attached, target_id";

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &SqlitePool,
    name: &str,
    vendor_id: &str,
    product_id: &str,
    product_rev: &str,
    vg_name: &str,
    size_gib: f64,
    use_flag: bool,
    target_id: Option<i64>,
) -> Result<LogicalUnit> {
    let sql = format!(
        "INSERT INTO logical_units (name, vendor_id, product_id, product_rev, vg_name, size_gib, use_flag, status, boot_count, target_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?) RETURNING {COLUMNS}"
    );
    let row = sqlx::query(sqlx::AssertSqlSafe(sql))
        .bind(name)
        .bind(vendor_id)
        .bind(product_id)
        .bind(product_rev)
        .bind(vg_name)
        .bind(size_gib)
        .bind(use_flag)
        .bind(LogicalUnitStatus::Offline.as_i64())
        .bind(target_id)
        .fetch_one(pool)
        .await?;
    from_row(&row)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<LogicalUnit> {
    let sql = format!("SELECT {COLUMNS} FROM logical_units WHERE id = ?");
    let row = sqlx::query(sqlx::AssertSqlSafe(sql))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(Error::NotFound { entity: "logical_unit", id })?;
    from_row(&row)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<LogicalUnit>> {
    let sql = format!("SELECT {COLUMNS} FROM logical_units ORDER BY id");
    let rows = sqlx::query(sqlx::AssertSqlSafe(sql)).fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

pub async fn list_by_target(pool: &SqlitePool, target_id: i64) -> Result<Vec<LogicalUnit>> {
    let sql = format!("SELECT {COLUMNS} FROM logical_units WHERE target_id = ? ORDER BY id");
    let rows = sqlx::query(sqlx::AssertSqlSafe(sql)).bind(target_id).fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

pub async fn list_by_status(pool: &SqlitePool, status: LogicalUnitStatus) -> Result<Vec<LogicalUnit>> {
    let sql = format!("SELECT {COLUMNS} FROM logical_units WHERE status = ? ORDER BY id");
    let rows = sqlx::query(sqlx::AssertSqlSafe(sql)).bind(status.as_i64()).fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

/// Persists the fields the Core's state machine mutates in one `UPDATE`,
/// matching §4.4's "every lifecycle transition is paired with a `save()`".
pub async fn save_lifecycle(
    pool: &SqlitePool,
    id: i64,
    status: LogicalUnitStatus,
    boot_count: i64,
    last_attached: Option<DateTime<Utc>>,
) -> Result<()> {
    let result = sqlx::query("UPDATE logical_units SET status = ?, boot_count = ?, last_attached = ? WHERE id = ?")
        .bind(status.as_i64())
        .bind(boot_count)
        .bind(last_attached)
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound { entity: "logical_unit", id });
    }
    Ok(())
}

pub async fn set_target(pool: &SqlitePool, id: i64, target_id: Option<i64>) -> Result<()> {
    let result = sqlx::query("UPDATE logical_units SET target_id = ? WHERE id = ?")
        .bind(target_id)
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound { entity: "logical_unit", id });
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM logical_units WHERE id = ?").bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound { entity: "logical_unit", id });
    }
    Ok(())
}
