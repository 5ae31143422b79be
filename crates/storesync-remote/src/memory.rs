//! # In-Process Memory Store
//!
//! A complete [`RemoteStore`] implementation backed by process memory.
//! Used by the test suite and local demos; it reproduces the managed
//! store's observable behavior:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    MemoryStore Behavior                                 │
//! │                                                                         │
//! │  • Every successful write broadcasts a FULL snapshot of the            │
//! │    affected collection to all of its subscribers                       │
//! │  • New subscribers receive the current snapshot immediately            │
//! │  • Snapshots per collection are emitted in write order                 │
//! │                                                                         │
//! │  FAULT INJECTION (tests)                                               │
//! │  ───────────────────────                                               │
//! │  • set_offline(true): reads and writes fail with Unavailable           │
//! │  • emit_error(collection): push an in-band stream error                │
//! │  • write_count(collection): observe exactly-once write behavior        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tracing::debug;

use storesync_core::Collection;

use crate::document::Document;
use crate::error::{RemoteError, RemoteResult};
use crate::store::{RemoteStore, Snapshot, SnapshotEvent, SubscriptionStream};

/// In-process document store with snapshot fan-out.
#[derive(Default)]
pub struct MemoryStore {
    /// Documents per collection, in insertion (server) order.
    data: Mutex<HashMap<Collection, Vec<Document>>>,

    /// Live snapshot subscribers per collection.
    subscribers: Mutex<HashMap<Collection, Vec<mpsc::UnboundedSender<SnapshotEvent>>>>,

    /// When set, reads and writes fail with `Unavailable`.
    offline: AtomicBool,

    /// Successful write count per collection (add/update/delete).
    writes: Mutex<HashMap<Collection, usize>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates connectivity loss for subsequent operations.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful writes (add/update/delete) to a collection.
    pub fn write_count(&self, collection: Collection) -> usize {
        *self
            .writes
            .lock()
            .expect("writes mutex poisoned")
            .get(&collection)
            .unwrap_or(&0)
    }

    /// Seeds a collection without counting writes. Broadcasts the resulting
    /// snapshot like any other change.
    pub fn seed(&self, collection: Collection, documents: Vec<Document>) {
        {
            let mut data = self.data.lock().expect("data mutex poisoned");
            data.insert(collection, documents);
        }
        self.broadcast(collection);
    }

    /// Pushes an in-band stream error to all subscribers of a collection.
    pub fn emit_error(&self, collection: Collection, error: RemoteError) {
        let mut subs = self.subscribers.lock().expect("subscribers mutex poisoned");
        if let Some(senders) = subs.get_mut(&collection) {
            senders.retain(|tx| tx.send(Err(error.clone())).is_ok());
        }
    }

    fn check_online(&self) -> RemoteResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RemoteError::Unavailable("simulated network loss".into()))
        } else {
            Ok(())
        }
    }

    fn current_snapshot(&self, collection: Collection) -> Snapshot {
        let data = self.data.lock().expect("data mutex poisoned");
        Snapshot {
            collection,
            documents: data.get(&collection).cloned().unwrap_or_default(),
        }
    }

    fn record_write(&self, collection: Collection) {
        let mut writes = self.writes.lock().expect("writes mutex poisoned");
        *writes.entry(collection).or_insert(0) += 1;
    }

    /// Fans the current snapshot out to every live subscriber, dropping
    /// senders whose stream has been dropped.
    fn broadcast(&self, collection: Collection) {
        let snapshot = self.current_snapshot(collection);
        let mut subs = self.subscribers.lock().expect("subscribers mutex poisoned");
        if let Some(senders) = subs.get_mut(&collection) {
            senders.retain(|tx| tx.send(Ok(snapshot.clone())).is_ok());
            debug!(
                collection = %collection,
                subscribers = senders.len(),
                docs = snapshot.documents.len(),
                "Broadcast snapshot"
            );
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list(&self, collection: Collection) -> RemoteResult<Vec<Document>> {
        self.check_online()?;
        Ok(self.current_snapshot(collection).documents)
    }

    async fn query_eq(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> RemoteResult<Vec<Document>> {
        self.check_online()?;
        let data = self.data.lock().expect("data mutex poisoned");
        Ok(data
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.str_field(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn add(&self, collection: Collection, fields: Map<String, Value>) -> RemoteResult<String> {
        self.check_online()?;

        let id = uuid::Uuid::new_v4().to_string();
        {
            let mut data = self.data.lock().expect("data mutex poisoned");
            data.entry(collection)
                .or_default()
                .push(Document::with_fields(id.clone(), fields));
        }
        self.record_write(collection);
        self.broadcast(collection);
        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
    ) -> RemoteResult<()> {
        self.check_online()?;

        {
            let mut data = self.data.lock().expect("data mutex poisoned");
            let docs = data.entry(collection).or_default();
            let doc = docs
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| RemoteError::NotFound {
                    collection,
                    id: id.to_string(),
                })?;
            doc.fields = fields;
        }
        self.record_write(collection);
        self.broadcast(collection);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> RemoteResult<()> {
        self.check_online()?;

        {
            let mut data = self.data.lock().expect("data mutex poisoned");
            let docs = data.entry(collection).or_default();
            let before = docs.len();
            docs.retain(|d| d.id != id);
            if docs.len() == before {
                return Err(RemoteError::NotFound {
                    collection,
                    id: id.to_string(),
                });
            }
        }
        self.record_write(collection);
        self.broadcast(collection);
        Ok(())
    }

    fn subscribe(&self, collection: Collection) -> SubscriptionStream {
        let (tx, stream) = SubscriptionStream::channel();

        // Initial snapshot, then register for future broadcasts
        let _ = tx.send(Ok(self.current_snapshot(collection)));
        self.subscribers
            .lock()
            .expect("subscribers mutex poisoned")
            .entry(collection)
            .or_default()
            .push(tx);

        stream
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
