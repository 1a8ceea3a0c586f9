//! Local libSQL database handle

use crate::error::Result;
use libsql::{Builder, Connection, Database as LibSqlDatabase};
use std::path::Path;

use super::migrations;

const MEMORY_TARGET: &str = ":memory:";

/// A migrated local database and its single connection.
pub struct Database {
    // Keeps the libSQL handle alive for as long as `conn` is in use.
    _db: LibSqlDatabase,
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file at `path` and migrate it.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let target = path.as_ref().to_string_lossy().into_owned();
        let database = Self::connect(&target).await?;
        tracing::debug!("Opened local database at {target}");
        Ok(database)
    }

    /// Fresh in-memory database, migrated. Contents vanish on drop.
    pub async fn open_in_memory() -> Result<Self> {
        Self::connect(MEMORY_TARGET).await
    }

    async fn connect(target: &str) -> Result<Self> {
        let db = Builder::new_local(target).build().await?;
        let conn = db.connect()?;
        apply_pragmas(&conn).await;
        migrations::run(&conn).await?;
        Ok(Self { _db: db, conn })
    }

    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Best effort; in-memory databases reject WAL.
async fn apply_pragmas(conn: &Connection) {
    for pragma in ["PRAGMA journal_mode = WAL", "PRAGMA synchronous = NORMAL"] {
        if let Err(e) = conn.execute(pragma, ()).await {
            tracing::debug!("Ignoring `{pragma}`: {e}");
        }
    }
}
