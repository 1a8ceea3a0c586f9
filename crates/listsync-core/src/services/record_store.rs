//! Observable record store

use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::db::{Database, LibSqlRecordRepository, RecordRepository};
use crate::models::Record;
use crate::Result;

/// Durable table of records, keyed by identity, observable as a live
/// sequence of snapshots.
#[derive(Clone)]
pub struct RecordStore {
    db: Arc<Mutex<Database>>,
    changes: Arc<watch::Sender<u64>>,
}

impl RecordStore {
    pub(crate) const fn new(db: Arc<Mutex<Database>>, changes: Arc<watch::Sender<u64>>) -> Self {
        Self { db, changes }
    }

    /// Insert or replace records by id. The whole batch is committed as one
    /// unit before observers are woken; records absent from `records` are kept.
    pub async fn upsert_all(&self, records: &[Record]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        {
            let db = self.db.lock().await;
            let repo = LibSqlRecordRepository::new(db.connection());
            repo.upsert_all(records).await?;
        }

        tracing::debug!("Merged {} records into local store", records.len());
        self.notify_changed();
        Ok(())
    }

    /// Current contents, ordered by `(group_id, display_name)`.
    pub async fn list_all(&self) -> Result<Vec<Record>> {
        let db = self.db.lock().await;
        let repo = LibSqlRecordRepository::new(db.connection());
        repo.list_all().await
    }

    /// Remove every record. Administrative only.
    pub async fn clear_all(&self) -> Result<()> {
        {
            let db = self.db.lock().await;
            let repo = LibSqlRecordRepository::new(db.connection());
            repo.clear_all().await?;
        }

        tracing::info!("Cleared local record store");
        self.notify_changed();
        Ok(())
    }

    /// Live sequence: the current contents first, then a fresh snapshot after
    /// every mutation.
    pub fn observe_all(&self) -> RecordStream {
        RecordStream {
            store: self.clone(),
            changes: self.changes.subscribe(),
            started: false,
        }
    }

    fn notify_changed(&self) {
        self.changes
            .send_modify(|version| *version = version.wrapping_add(1));
    }
}

/// Subscription returned by [`RecordStore::observe_all`].
///
/// Mutations that land while a snapshot is being read are coalesced into the
/// next snapshot, so the latest state is always delivered.
pub struct RecordStream {
    store: RecordStore,
    changes: watch::Receiver<u64>,
    started: bool,
}

impl RecordStream {
    /// Wait for the next snapshot.
    ///
    /// The stream keeps its store alive, so it never ends on its own; a read
    /// failure is returned as `Some(Err(_))`.
    pub async fn next(&mut self) -> Option<Result<Vec<Record>>> {
        if self.started {
            self.changes.changed().await.ok()?;
        } else {
            self.started = true;
        }
        Some(self.store.list_all().await)
    }
}
