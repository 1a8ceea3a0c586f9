//! Schema migrations for the local cache

use crate::error::{Error, Result};
use libsql::Connection;

/// Ordered schema steps; entry `i` upgrades the schema to version `i + 1`.
const MIGRATIONS: &[&[&str]] = &[&[
    "CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER PRIMARY KEY
    )",
    // One row per record identity; rows are replaced wholesale on refresh
    "CREATE TABLE IF NOT EXISTS list_items (
        id INTEGER PRIMARY KEY,
        list_id INTEGER NOT NULL,
        name TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_list_items_list_name ON list_items(list_id, name)",
    "CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )",
]];

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const CURRENT_VERSION: i64 = MIGRATIONS.len() as i64;

/// Bring the schema up to [`CURRENT_VERSION`].
pub async fn run(conn: &Connection) -> Result<()> {
    let installed = schema_version(conn).await?;
    if installed > CURRENT_VERSION {
        return Err(Error::Database(format!(
            "schema version {installed} is newer than supported version {CURRENT_VERSION}"
        )));
    }

    for (target, statements) in (1..=CURRENT_VERSION).zip(MIGRATIONS.iter()) {
        if target > installed {
            apply(conn, target, statements).await?;
            tracing::info!("Migrated local cache to schema version {target}");
        }
    }

    Ok(())
}

async fn schema_version(conn: &Connection) -> Result<i64> {
    let mut rows = conn
        .query(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            (),
        )
        .await?;
    let has_table = match rows.next().await? {
        Some(row) => row.get::<i64>(0)? > 0,
        None => false,
    };
    if !has_table {
        return Ok(0);
    }

    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await?;
    match rows.next().await? {
        Some(row) => Ok(row.get(0)?),
        None => Ok(0),
    }
}

/// Apply one step and record it, all inside a single transaction.
async fn apply(conn: &Connection, version: i64, statements: &[&str]) -> Result<()> {
    conn.execute("BEGIN TRANSACTION", ()).await?;

    let outcome = async {
        for statement in statements {
            conn.execute(statement, ()).await?;
        }
        conn.execute("INSERT INTO schema_version (version) VALUES (?)", [version])
            .await?;
        conn.execute("COMMIT", ()).await?;
        Ok::<_, libsql::Error>(())
    }
    .await;

    if let Err(e) = outcome {
        conn.execute("ROLLBACK", ()).await.ok();
        return Err(e.into());
    }
    Ok(())
}
