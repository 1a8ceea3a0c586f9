//! Test doubles shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::watch;

use crate::models::Record;
use crate::remote::{RemoteError, RemoteResult, RemoteSource};

/// Remote source whose answer can be switched between a record set and an
/// outage while a test runs.
pub struct FakeRemote {
    records: Mutex<Option<Vec<Record>>>,
    calls: AtomicUsize,
}

impl FakeRemote {
    pub fn serving(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(Some(records)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            records: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn serve(&self, records: Vec<Record>) {
        *self.records.lock().unwrap() = Some(records);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RemoteSource for FakeRemote {
    async fn fetch_all(&self) -> RemoteResult<Vec<Record>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().unwrap().clone();
        records.ok_or_else(|| RemoteError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }
}

/// Remote source whose fetches park until [`GatedRemote::open`] is called.
/// Never opening it models a request that hangs forever.
pub struct GatedRemote {
    records: Vec<Record>,
    gate: watch::Sender<bool>,
    calls: AtomicUsize,
}

impl GatedRemote {
    pub fn closed(records: Vec<Record>) -> Self {
        let (gate, _) = watch::channel(false);
        Self {
            records,
            gate,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn open(&self) {
        self.gate.send_replace(true);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RemoteSource for GatedRemote {
    async fn fetch_all(&self) -> RemoteResult<Vec<Record>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut gate = self.gate.subscribe();
        let opened = gate.wait_for(|open| *open).await.is_ok();
        if !opened {
            std::future::pending::<()>().await;
        }
        Ok(self.records.clone())
    }
}
