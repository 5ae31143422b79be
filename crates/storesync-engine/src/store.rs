//! # Entity Store
//!
//! The single normalized cache of remote entities. Subscriptions are its
//! only writers; every screen-facing read goes through it.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        EntityStore Data Flow                            │
//! │                                                                         │
//! │  SubscriptionManager ──snapshot──► replace_inventory / replace_catalog │
//! │                                           │                             │
//! │                                           ▼                             │
//! │                                   ┌──────────────┐     entities_changed │
//! │   readers (UI, workflows) ◄────── │  EntityStore │ ──► StoreEventEmitter│
//! │                                   └──────────────┘                      │
//! │                                                                         │
//! │  REPLACEMENT SEMANTICS                                                 │
//! │  ─────────────────────                                                 │
//! │  • Each snapshot REPLACES the cached set wholesale (never merged)      │
//! │  • Applying a snapshot clears the collection's loading flag            │
//! │  • On stream error the last good set is RETAINED (stale > empty)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use storesync_core::types::{CatalogProduct, Collection, InventoryItem};

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Trait for notifying the host frontend of store changes.
pub trait StoreEventEmitter: Send + Sync {
    /// A collection's cached entity set was replaced.
    fn entities_changed(&self, collection: Collection, count: usize);

    /// A collection's loading flag changed.
    fn loading_changed(&self, collection: Collection, loading: bool);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl StoreEventEmitter for NoOpEmitter {
    fn entities_changed(&self, _collection: Collection, _count: usize) {}
    fn loading_changed(&self, _collection: Collection, _loading: bool) {}
}

// =============================================================================
// Entity Store
// =============================================================================

#[derive(Debug, Default)]
struct EntityState {
    inventory: Vec<InventoryItem>,
    catalog: Vec<CatalogProduct>,
    inventory_loading: bool,
    catalog_loading: bool,
}

/// Normalized entity cache shared between subscriptions and readers.
pub struct EntityStore {
    inner: Mutex<EntityState>,
    emitter: Arc<dyn StoreEventEmitter>,
}

impl EntityStore {
    /// Creates an empty store with no event emitter.
    pub fn new() -> Self {
        Self::with_emitter(Arc::new(NoOpEmitter))
    }

    /// Creates an empty store with a custom event emitter.
    pub fn with_emitter(emitter: Arc<dyn StoreEventEmitter>) -> Self {
        EntityStore {
            inner: Mutex::new(EntityState::default()),
            emitter,
        }
    }

    // =========================================================================
    // Writers (subscription side)
    // =========================================================================

    /// Replaces the cached inventory set wholesale and clears its loading
    /// flag.
    pub fn replace_inventory(&self, items: Vec<InventoryItem>) {
        let count = items.len();
        {
            let mut state = self.inner.lock().expect("entity state poisoned");
            state.inventory = items;
            state.inventory_loading = false;
        }
        debug!(count, "Inventory replaced");
        self.emitter.entities_changed(Collection::Inventory, count);
        self.emitter.loading_changed(Collection::Inventory, false);
    }

    /// Replaces the cached catalog set wholesale and clears its loading flag.
    pub fn replace_catalog(&self, products: Vec<CatalogProduct>) {
        let count = products.len();
        {
            let mut state = self.inner.lock().expect("entity state poisoned");
            state.catalog = products;
            state.catalog_loading = false;
        }
        debug!(count, "Catalog replaced");
        self.emitter.entities_changed(Collection::Products, count);
        self.emitter.loading_changed(Collection::Products, false);
    }

    /// Sets a collection's loading flag (raised when a watch starts, cleared
    /// by the first snapshot).
    pub fn set_loading(&self, collection: Collection, loading: bool) {
        {
            let mut state = self.inner.lock().expect("entity state poisoned");
            match collection {
                Collection::Inventory => state.inventory_loading = loading,
                Collection::Products => state.catalog_loading = loading,
                Collection::Invoices => return, // invoices are bulk-read, never cached
            }
        }
        self.emitter.loading_changed(collection, loading);
    }

    // =========================================================================
    // Readers
    // =========================================================================

    /// Current inventory set, in delivered document order.
    pub fn inventory(&self) -> Vec<InventoryItem> {
        self.inner
            .lock()
            .expect("entity state poisoned")
            .inventory
            .clone()
    }

    /// Current catalog set, in delivered document order.
    pub fn catalog(&self) -> Vec<CatalogProduct> {
        self.inner
            .lock()
            .expect("entity state poisoned")
            .catalog
            .clone()
    }

    /// Whether a collection is waiting for its first snapshot.
    pub fn is_loading(&self, collection: Collection) -> bool {
        let state = self.inner.lock().expect("entity state poisoned");
        match collection {
            Collection::Inventory => state.inventory_loading,
            Collection::Products => state.catalog_loading,
            Collection::Invoices => false,
        }
    }

    /// Looks up one inventory item by document key.
    pub fn find_inventory(&self, id: &str) -> Option<InventoryItem> {
        self.inner
            .lock()
            .expect("entity state poisoned")
            .inventory
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    /// Looks up a catalog product by barcode against the cached set.
    ///
    /// Deactivated products never match. Uniqueness is not enforced; the
    /// first active match in delivered order wins and duplicates are
    /// logged.
    pub fn find_product_by_barcode(&self, barcode: &str) -> Option<CatalogProduct> {
        let state = self.inner.lock().expect("entity state poisoned");
        let mut matches = state
            .catalog
            .iter()
            .filter(|p| p.is_active && p.barcode == barcode);
        let first = matches.next().cloned();
        if matches.next().is_some() {
            warn!(barcode, "Multiple catalog products share a barcode, taking first");
        }
        first
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
