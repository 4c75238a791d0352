//! Snapshot repository. Enforces the "at most one active snapshot per
//! logical unit" invariant from §3 at the call site via [`activate`].

use sqlx::{Row, SqlitePool};

use crate::error::{Error, Result};
use crate::models::Snapshot;

fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Snapshot> {
    Ok(Snapshot {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        size_gib: row.try_get("size_gib")?,
        active: row.try_get("active")?,
        description: row.try_get("description")?,
        logical_unit_id: row.try_get("logical_unit_id")?,
    })
}

const COLUMNS: &str = "id, name, size_gib, active, description, logical_unit_id";

pub async fn create(pool: &SqlitePool, name: &str, size_gib: f64, description: &str, logical_unit_id: i64) -> Result<Snapshot> {
    let sql = format!(
        "INSERT INTO snapshots (name, size_gib, active, description, logical_unit_id) VALUES (?, ?, 0, ?, ?) RETURNING {COLUMNS}"
    );
    let row = sqlx::query(sqlx::AssertSqlSafe(sql))
        .bind(name)
        .bind(size_gib)
        .bind(description)
        .bind(logical_unit_id)
        .fetch_one(pool)
        .await?;
    from_row(&row)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Snapshot> {
    let sql = format!("SELECT {COLUMNS} FROM snapshots WHERE id = ?");
    let row = sqlx::query(sqlx::AssertSqlSafe(sql))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(Error::NotFound { entity: "snapshot", id })?;
    from_row(&row)
}

pub async fn list_by_logical_unit(pool: &SqlitePool, logical_unit_id: i64) -> Result<Vec<Snapshot>> {
    let sql = format!("SELECT {COLUMNS} FROM snapshots WHERE logical_unit_id = ? ORDER BY id");
    let rows = sqlx::query(sqlx::AssertSqlSafe(sql)).bind(logical_unit_id).fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

pub async fn get_active(pool: &SqlitePool, logical_unit_id: i64) -> Result<Option<Snapshot>> {
    let sql = format!("SELECT {COLUMNS} FROM snapshots WHERE logical_unit_id = ? AND active = 1");
    let row = sqlx::query(sqlx::AssertSqlSafe(sql)).bind(logical_unit_id).fetch_optional(pool).await?;
    row.as_ref().map(from_row).transpose()
}

/// Marks `id` as the sole active snapshot of its logical unit, deactivating
/// any previously-active one first.
pub async fn activate(pool: &SqlitePool, id: i64) -> Result<()> {
    let snapshot = get(pool, id).await?;
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE snapshots SET active = 0 WHERE logical_unit_id = ?")
        .bind(snapshot.logical_unit_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE snapshots SET active = 1 WHERE id = ?").bind(id).execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM snapshots WHERE id = ?").bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound { entity: "snapshot", id });
    }
    Ok(())
}
