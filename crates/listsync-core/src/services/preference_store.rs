//! Observable layout preference

use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::db::{Database, LibSqlSettingsRepository, SettingsRepository};
use crate::Result;

/// Durable boolean `is_list_mode`, defaulting to `true` when never written.
#[derive(Clone)]
pub struct PreferenceStore {
    db: Arc<Mutex<Database>>,
    changes: Arc<watch::Sender<u64>>,
}

impl PreferenceStore {
    pub(crate) const fn new(db: Arc<Mutex<Database>>, changes: Arc<watch::Sender<u64>>) -> Self {
        Self { db, changes }
    }

    /// Current layout preference.
    pub async fn layout_mode(&self) -> Result<bool> {
        let db = self.db.lock().await;
        LibSqlSettingsRepository::new(db.connection())
            .load_list_mode()
            .await
    }

    /// Persist the layout preference and wake observers.
    pub async fn set_layout_mode(&self, is_list_mode: bool) -> Result<()> {
        {
            let db = self.db.lock().await;
            LibSqlSettingsRepository::new(db.connection())
                .save_list_mode(is_list_mode)
                .await?;
        }

        tracing::debug!(is_list_mode, "Saved layout preference");
        self.changes
            .send_modify(|version| *version = version.wrapping_add(1));
        Ok(())
    }

    /// Live sequence of the preference: the current value first, then the
    /// value after every write.
    pub fn observe_layout_mode(&self) -> LayoutModeStream {
        LayoutModeStream {
            store: self.clone(),
            changes: self.changes.subscribe(),
            started: false,
        }
    }
}

/// Subscription returned by [`PreferenceStore::observe_layout_mode`].
pub struct LayoutModeStream {
    store: PreferenceStore,
    changes: watch::Receiver<u64>,
    started: bool,
}

impl LayoutModeStream {
    pub async fn next(&mut self) -> Option<Result<bool>> {
        if self.started {
            self.changes.changed().await.ok()?;
        } else {
            self.started = true;
        }
        Some(self.store.layout_mode().await)
    }
}
