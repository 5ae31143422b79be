//! # The RemoteStore Trait
//!
//! Everything in the workspace talks to the managed document store through
//! this seam. Production wires in the real backend adapter; tests wire in
//! [`crate::MemoryStore`].
//!
//! ## Delivery Guarantees
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Subscription Semantics                                │
//! │                                                                         │
//! │  • Every change event delivers a FULL ordered document list            │
//! │    (snapshots, not deltas)                                              │
//! │  • Snapshots for ONE collection arrive in emission order               │
//! │  • NO ordering is guaranteed ACROSS collections                         │
//! │  • A new subscriber receives the current snapshot immediately          │
//! │  • Stream errors are delivered in-band as events; the stream may       │
//! │    continue afterwards (the store owns reconnection)                    │
//! │                                                                         │
//! │  Writes are atomic per document and report success/failure only —      │
//! │  there is no partial-field failure.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use storesync_core::Collection;

use crate::document::Document;
use crate::error::RemoteResult;

// =============================================================================
// Snapshots
// =============================================================================

/// A full, ordered listing of one collection at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// The collection this snapshot describes.
    pub collection: Collection,

    /// All documents in the collection, in server order.
    pub documents: Vec<Document>,
}

/// One delivery on a subscription stream: a snapshot, or an in-band error
/// (connectivity loss reported by the store).
pub type SnapshotEvent = RemoteResult<Snapshot>;

// =============================================================================
// Subscription Stream
// =============================================================================

/// Receiving half of a change subscription.
///
/// The stream ends (yields `None`) when the store tears the subscription
/// down; consumers treat that the same as cancellation.
pub struct SubscriptionStream {
    rx: mpsc::UnboundedReceiver<SnapshotEvent>,
}

impl SubscriptionStream {
    /// Creates a connected sender/stream pair.
    ///
    /// Store implementations keep the sender and hand the stream to the
    /// subscriber.
    pub fn channel() -> (mpsc::UnboundedSender<SnapshotEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, SubscriptionStream { rx })
    }

    /// Waits for the next delivery. `None` means the stream is closed.
    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        self.rx.recv().await
    }
}

impl std::fmt::Debug for SubscriptionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionStream").finish_non_exhaustive()
    }
}

// =============================================================================
// RemoteStore Trait
// =============================================================================

/// The managed document store contract.
///
/// ## Collections
/// `inventory`, `products` (catalog), `invoices` — see
/// [`storesync_core::Collection`].
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Bulk read: every document currently in the collection, in server
    /// order.
    async fn list(&self, collection: Collection) -> RemoteResult<Vec<Document>>;

    /// Single-field equality query (e.g., catalog lookup by barcode).
    /// Matches are returned in server order; the caller owns tie-breaking.
    async fn query_eq(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> RemoteResult<Vec<Document>>;

    /// Atomically creates one document, returning its server-assigned key.
    async fn add(&self, collection: Collection, fields: Map<String, Value>) -> RemoteResult<String>;

    /// Atomically replaces the fields of one existing document.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
    ) -> RemoteResult<()>;

    /// Deletes one document.
    async fn delete(&self, collection: Collection, id: &str) -> RemoteResult<()>;

    /// Opens a change subscription for one collection.
    ///
    /// The current snapshot is delivered immediately, then one snapshot per
    /// subsequent change. Dropping the stream unsubscribes.
    fn subscribe(&self, collection: Collection) -> SubscriptionStream;
}
