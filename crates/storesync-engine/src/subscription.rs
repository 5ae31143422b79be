//! # Subscription Manager
//!
//! Owns the change subscriptions that keep the entity store current.
//!
//! ## Watch Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Watch Lifecycle                                    │
//! │                                                                         │
//! │  start(collection)                                                     │
//! │  ─────────────────                                                     │
//! │  1. Retire any existing watch for the collection (its liveness         │
//! │     token flips to dead, its task is aborted)                          │
//! │  2. Raise the collection's loading flag                                │
//! │  3. Open a subscription stream and spawn the watch task                │
//! │                                                                         │
//! │  watch task (per event)                                                │
//! │  ──────────────────────                                                │
//! │  • liveness token dead?  → discard event, exit (late snapshots from    │
//! │    a retired watch must never touch the store)                         │
//! │  • Ok(snapshot)          → normalize, REPLACE cached set, status Live  │
//! │  • Err(stream error)     → status Stale, cached set RETAINED           │
//! │                                                                         │
//! │  stop(collection)                                                      │
//! │  ────────────────                                                      │
//! │  Kill the token first, then abort: even an event already pulled off    │
//! │  the stream can no longer be applied.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use storesync_core::types::Collection;
use storesync_remote::{RemoteStore, SubscriptionStream};

use crate::mapping::{catalog_from_docs, inventory_from_docs};
use crate::store::EntityStore;

// =============================================================================
// Watch Status
// =============================================================================

/// Externally observable state of one collection's watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchStatus {
    /// No watch running for this collection.
    #[default]
    Inactive,

    /// Watch running, last event was a snapshot.
    Live,

    /// Watch running, last event was a stream error; the cached set is the
    /// last good snapshot.
    Stale,
}

// =============================================================================
// Subscription Manager
// =============================================================================

struct Watch {
    /// Liveness token checked by the watch task before every apply.
    alive: Arc<AtomicBool>,

    /// The spawned watch task.
    task: JoinHandle<()>,
}

/// Manages at most one watch per collection.
pub struct SubscriptionManager {
    remote: Arc<dyn RemoteStore>,
    entities: Arc<EntityStore>,
    watches: Mutex<HashMap<Collection, Watch>>,
    statuses: Arc<Mutex<HashMap<Collection, WatchStatus>>>,
}

impl SubscriptionManager {
    /// Creates a manager with no active watches.
    pub fn new(remote: Arc<dyn RemoteStore>, entities: Arc<EntityStore>) -> Self {
        SubscriptionManager {
            remote,
            entities,
            watches: Mutex::new(HashMap::new()),
            statuses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Starts (or restarts) the watch for one collection.
    ///
    /// An existing watch for the same collection is retired first; its
    /// token dies before the new stream opens, so snapshots it already
    /// holds can never overwrite newer ones. The watch map stays locked
    /// from retire through insert, so two concurrent starts cannot each
    /// leave a live watch behind.
    pub fn start(&self, collection: Collection) {
        let mut watches = self.watches.lock().expect("watches poisoned");
        self.retire(&mut watches, collection);

        info!(collection = %collection, "Starting watch");
        self.entities.set_loading(collection, true);

        let alive = Arc::new(AtomicBool::new(true));
        let stream = self.remote.subscribe(collection);
        let task = tokio::spawn(Self::watch_loop(
            collection,
            stream,
            alive.clone(),
            self.entities.clone(),
            self.statuses.clone(),
        ));

        self.set_status(collection, WatchStatus::Live);
        watches.insert(collection, Watch { alive, task });
    }

    /// Stops the watch for one collection, if any.
    ///
    /// The cached entity set is left in place; stopping a watch means
    /// "no more updates", not "forget what we know".
    pub fn stop(&self, collection: Collection) {
        let mut watches = self.watches.lock().expect("watches poisoned");
        self.retire(&mut watches, collection);
    }

    /// Removes and kills the watch for one collection, if any. The caller
    /// holds the watch map lock.
    fn retire(&self, watches: &mut HashMap<Collection, Watch>, collection: Collection) {
        if let Some(watch) = watches.remove(&collection) {
            info!(collection = %collection, "Stopping watch");
            // Token first, then abort: an event already pulled off the
            // stream must fail the liveness check.
            watch.alive.store(false, Ordering::SeqCst);
            watch.task.abort();
            self.set_status(collection, WatchStatus::Inactive);
        }
    }

    /// Stops every active watch.
    pub fn stop_all(&self) {
        for collection in [Collection::Inventory, Collection::Products, Collection::Invoices] {
            self.stop(collection);
        }
    }

    /// Current watch status for a collection.
    pub fn status(&self, collection: Collection) -> WatchStatus {
        self.statuses
            .lock()
            .expect("statuses poisoned")
            .get(&collection)
            .copied()
            .unwrap_or_default()
    }

    fn set_status(&self, collection: Collection, status: WatchStatus) {
        self.statuses
            .lock()
            .expect("statuses poisoned")
            .insert(collection, status);
    }

    /// Per-watch event loop. Runs until the stream closes or the watch is
    /// retired.
    async fn watch_loop(
        collection: Collection,
        mut stream: SubscriptionStream,
        alive: Arc<AtomicBool>,
        entities: Arc<EntityStore>,
        statuses: Arc<Mutex<HashMap<Collection, WatchStatus>>>,
    ) {
        while let Some(event) = stream.next().await {
            if !alive.load(Ordering::SeqCst) {
                debug!(collection = %collection, "Watch retired, discarding event");
                break;
            }

            match event {
                Ok(snapshot) => {
                    match collection {
                        Collection::Inventory => {
                            entities.replace_inventory(inventory_from_docs(&snapshot.documents));
                        }
                        Collection::Products => {
                            entities.replace_catalog(catalog_from_docs(&snapshot.documents));
                        }
                        // Invoices are bulk-read by reporting, never cached.
                        Collection::Invoices => {}
                    }
                    statuses
                        .lock()
                        .expect("statuses poisoned")
                        .insert(collection, WatchStatus::Live);
                }
                Err(e) => {
                    // Stale beats empty: keep showing the last good set.
                    warn!(collection = %collection, error = %e, "Watch stream error, retaining cached set");
                    statuses
                        .lock()
                        .expect("statuses poisoned")
                        .insert(collection, WatchStatus::Stale);
                }
            }
        }

        debug!(collection = %collection, "Watch loop ended");
    }
}

impl Drop for SubscriptionManager {
    fn drop(&mut self) {
        let mut watches = match self.watches.lock() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (_, watch) in watches.drain() {
            watch.alive.store(false, Ordering::SeqCst);
            watch.task.abort();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
