//! Connection setup: one `SqlitePool`, schema applied on connect.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;
use crate::schema::CREATE_TABLES;

/// Opens (creating if absent) the SQLite database at `path` and applies the
/// embedded schema.
pub async fn connect(path: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new().filename(path).create_if_missing(true);

    let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;

    for statement in CREATE_TABLES.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement).execute(&pool).await?;
    }

    info!(path, "metadata store ready");
    Ok(pool)
}
