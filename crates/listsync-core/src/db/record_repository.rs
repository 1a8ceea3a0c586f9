//! Record repository implementation

use crate::error::Result;
use crate::models::Record;
use libsql::{Connection, Row, Value};

/// Trait for record storage operations (async)
#[allow(async_fn_in_trait)]
pub trait RecordRepository {
    /// Insert or replace records by id, as one transaction. Never deletes.
    async fn upsert_all(&self, records: &[Record]) -> Result<()>;

    /// All stored records ordered by `(group_id, display_name)`
    async fn list_all(&self) -> Result<Vec<Record>>;

    /// Remove every stored record
    async fn clear_all(&self) -> Result<()>;
}

/// libSQL implementation of `RecordRepository`
pub struct LibSqlRecordRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlRecordRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_record(row: &Row) -> Result<Record> {
        let display_name = match row.get_value(2)? {
            Value::Text(name) => Some(name),
            _ => None,
        };
        Ok(Record {
            id: row.get(0)?,
            group_id: row.get(1)?,
            display_name,
        })
    }

    async fn insert_or_replace(&self, record: &Record) -> Result<()> {
        let name = record
            .display_name
            .clone()
            .map_or(Value::Null, Value::Text);
        self.conn
            .execute(
                "INSERT OR REPLACE INTO list_items (id, list_id, name) VALUES (?, ?, ?)",
                libsql::params![record.id, record.group_id, name],
            )
            .await?;
        Ok(())
    }
}

impl RecordRepository for LibSqlRecordRepository<'_> {
    async fn upsert_all(&self, records: &[Record]) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", ()).await?;

        for record in records {
            if let Err(e) = self.insert_or_replace(record).await {
                self.conn.execute("ROLLBACK", ()).await.ok();
                return Err(e);
            }
        }

        if let Err(e) = self.conn.execute("COMMIT", ()).await {
            self.conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Record>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, list_id, name FROM list_items ORDER BY list_id ASC, name ASC",
                (),
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(Self::parse_record(&row)?);
        }
        Ok(records)
    }

    async fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM list_items", ()).await?;
        Ok(())
    }
}
