//! Shared database service wrapper used across clients.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::db::Database;
use crate::Result;

use super::{PreferenceStore, RecordStore};

/// Owner of the local database and of the change notifiers that make its
/// stores observable.
///
/// Constructed once at the composition root and cloned into whatever needs a
/// store handle; every handle shares one connection and one notifier per
/// table, so a write through any handle wakes every observer.
#[derive(Clone)]
pub struct DatabaseService {
    db: Arc<Mutex<Database>>,
    record_changes: Arc<watch::Sender<u64>>,
    settings_changes: Arc<watch::Sender<u64>>,
}

impl DatabaseService {
    /// Open a database service at the given filesystem path.
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!("Opening local store at {}", db_path.display());
        let db = Database::open(&db_path).await?;
        Ok(Self::from_database(db))
    }

    /// Open an in-memory database service (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self::from_database(db))
    }

    fn from_database(db: Database) -> Self {
        let (record_changes, _) = watch::channel(0);
        let (settings_changes, _) = watch::channel(0);
        Self {
            db: Arc::new(Mutex::new(db)),
            record_changes: Arc::new(record_changes),
            settings_changes: Arc::new(settings_changes),
        }
    }

    /// Handle to the durable record table.
    pub fn record_store(&self) -> RecordStore {
        RecordStore::new(Arc::clone(&self.db), Arc::clone(&self.record_changes))
    }

    /// Handle to the durable layout preference.
    pub fn preference_store(&self) -> PreferenceStore {
        PreferenceStore::new(Arc::clone(&self.db), Arc::clone(&self.settings_changes))
    }

    /// Hold the connection so every store operation waits behind the guard.
    #[cfg(test)]
    pub(crate) async fn lock(&self) -> tokio::sync::MutexGuard<'_, Database> {
        self.db.lock().await
    }
}
