//! Offline-first sync repository.
//!
//! Readers always see what the local store holds; the remote source only
//! ever feeds the store, never the reader directly.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::models::{process_records, Record};
use crate::remote::RemoteSource;
use crate::services::{RecordStore, RecordStream};
use crate::Result;

/// Single source of truth for the record list: a local [`RecordStore`] fed by
/// a [`RemoteSource`]. Cheap to clone; clones share the remote and the store.
pub struct SyncRepository<R> {
    remote: Arc<R>,
    store: RecordStore,
}

impl<R> Clone for SyncRepository<R> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            store: self.store.clone(),
        }
    }
}

impl<R: RemoteSource> SyncRepository<R> {
    /// Repository owning `remote`.
    pub fn new(remote: R, store: RecordStore) -> Self {
        Self::with_shared_remote(Arc::new(remote), store)
    }

    /// Repository over a remote that the caller keeps a handle to.
    pub const fn with_shared_remote(remote: Arc<R>, store: RecordStore) -> Self {
        Self { remote, store }
    }

    /// The backing local store.
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Live processed view plus one background fetch attempt.
    ///
    /// The returned sequence emits the stored view immediately. A successful
    /// fetch lands in the store and is re-emitted from there; a failed fetch
    /// is logged and otherwise invisible.
    pub fn processed_items(&self) -> ProcessedItems {
        let items = self.observe_processed();
        self.refresh_in_background();
        items
    }

    /// Live processed view of the store, with no network side effect.
    pub fn observe_processed(&self) -> ProcessedItems {
        ProcessedItems {
            inner: self.store.observe_all(),
        }
    }

    /// Spawn one fetch-and-merge. Failures are swallowed after logging.
    pub fn refresh_in_background(&self) -> JoinHandle<()> {
        let repository = self.clone();
        tokio::spawn(async move {
            if let Err(e) = repository.refresh_items().await {
                tracing::warn!("Background refresh failed, serving cached records: {e}");
            }
        })
    }

    /// One fetch and merge into the store. Fetch failures propagate.
    pub async fn refresh_items(&self) -> Result<()> {
        let records = self.remote.fetch_all().await?;
        tracing::info!("Fetched {} records from remote", records.len());
        self.store.upsert_all(&records).await
    }
}

/// Live sequence of the processed view (filtered and ordered records).
pub struct ProcessedItems {
    inner: RecordStream,
}

impl ProcessedItems {
    /// Next processed snapshot. See [`RecordStream::next`].
    pub async fn next(&mut self) -> Option<Result<Vec<Record>>> {
        let snapshot = self.inner.next().await?;
        Some(snapshot.map(process_records))
    }
}
