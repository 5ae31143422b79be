//! # Engine Facade
//!
//! Wires every component to one remote store and entity cache, the way a
//! host application consumes the crate.
//!
//! ## Component Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SyncEngine Wiring                               │
//! │                                                                         │
//! │                        ┌──────────────┐                                 │
//! │        RemoteStore ──► │  SyncEngine  │ ◄── EngineConfig                │
//! │                        └──────┬───────┘                                 │
//! │          ┌──────────┬────────┼──────────┬─────────────┐                │
//! │          ▼          ▼        ▼          ▼             ▼                 │
//! │   Subscription   Scan     Billing   Inventory/   Reporting             │
//! │   Manager        Workflow Service   Catalog      Service               │
//! │          │                          Services                            │
//! │          ▼                                                              │
//! │     EntityStore  ◄── every reader                                      │
//! │                                                                         │
//! │  start() opens the inventory and catalog watches; invoices are never   │
//! │  watched (reporting bulk-reads them on demand).                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tracing::info;

use storesync_remote::RemoteStore;

use crate::barcode::ScanWorkflow;
use crate::billing::BillingService;
use crate::catalog::CatalogService;
use crate::config::EngineConfig;
use crate::inventory::InventoryService;
use crate::reporting::ReportingService;
use crate::store::{EntityStore, StoreEventEmitter};
use crate::subscription::SubscriptionManager;
use storesync_core::types::Collection;

/// One fully wired engine instance.
pub struct SyncEngine {
    entities: Arc<EntityStore>,
    subscriptions: SubscriptionManager,
    scan: ScanWorkflow,
    billing: BillingService,
    inventory: InventoryService,
    catalog: CatalogService,
    reporting: ReportingService,
}

impl SyncEngine {
    /// Wires the engine with no frontend emitter.
    pub fn new(remote: Arc<dyn RemoteStore>, config: EngineConfig) -> Self {
        Self::with_emitter(remote, config, Arc::new(crate::store::NoOpEmitter))
    }

    /// Wires the engine with a host event emitter.
    pub fn with_emitter(
        remote: Arc<dyn RemoteStore>,
        config: EngineConfig,
        emitter: Arc<dyn StoreEventEmitter>,
    ) -> Self {
        let entities = Arc::new(EntityStore::with_emitter(emitter));

        SyncEngine {
            subscriptions: SubscriptionManager::new(remote.clone(), entities.clone()),
            scan: ScanWorkflow::new(remote.clone()),
            billing: BillingService::new(remote.clone(), config.store.clone()),
            inventory: InventoryService::new(remote.clone()),
            catalog: CatalogService::new(remote.clone()),
            reporting: ReportingService::new(
                remote,
                entities.clone(),
                config.reporting.clone(),
            ),
            entities,
        }
    }

    /// Opens the standing watches.
    pub fn start(&self) {
        info!("Starting sync engine");
        self.subscriptions.start(Collection::Inventory);
        self.subscriptions.start(Collection::Products);
    }

    /// Retires every watch. Cached entities remain readable.
    pub fn shutdown(&self) {
        info!("Shutting down sync engine");
        self.subscriptions.stop_all();
    }

    pub fn entities(&self) -> &Arc<EntityStore> {
        &self.entities
    }

    pub fn subscriptions(&self) -> &SubscriptionManager {
        &self.subscriptions
    }

    pub fn scan(&self) -> &ScanWorkflow {
        &self.scan
    }

    pub fn billing(&self) -> &BillingService {
        &self.billing
    }

    pub fn inventory(&self) -> &InventoryService {
        &self.inventory
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn reporting(&self) -> &ReportingService {
        &self.reporting
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;
    use storesync_core::money::Money;
    use storesync_core::types::PaymentMode;
    use storesync_remote::{Document, MemoryStore};

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    /// Full counter session: watch, scan, bill, submit, report.
    #[tokio::test]
    async fn test_counter_session_end_to_end() {
        let remote = Arc::new(MemoryStore::new());
        remote.seed(
            Collection::Products,
            vec![Document::new("p1")
                .set("barcode", "8901030875021")
                .set("name", "Basmati Rice")
                .set("price", 25000)
                .set("category", "Groceries")],
        );

        let engine = SyncEngine::new(remote.clone(), EngineConfig::default());
        engine.start();
        settle().await;
        assert_eq!(engine.entities().catalog().len(), 1);

        // Scan resolves against the catalog
        engine.scan().begin_capture().unwrap();
        assert!(engine.scan().deliver_decode("8901030875021"));
        let state = engine.scan().resolve().await.unwrap();
        let product = match state {
            crate::barcode::ScanState::Found { product } => product,
            other => panic!("expected Found, got {:?}", other),
        };

        // Prefill a line from the hit and submit
        engine.billing().add_product(&product, 1).unwrap();
        engine.scan().dismiss();
        let submitted = engine
            .billing()
            .submit("Asha", "9999999999", PaymentMode::Cash, Utc::now())
            .await
            .unwrap();
        assert_eq!(submitted.invoice.total, Money::from_paise(25000));
        assert_eq!(remote.write_count(Collection::Invoices), 1);
        assert!(submitted.message.contains("Basmati Rice"));

        // The submitted invoice shows up in reporting
        let summary = engine.reporting().sales_summary(Utc::now()).await.unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.last_seven_days, Money::from_paise(25000));

        engine.shutdown();
        assert_eq!(
            engine.subscriptions().status(Collection::Inventory),
            crate::subscription::WatchStatus::Inactive
        );
    }

    /// A create-on-miss seed arrives back through the inventory watch.
    #[tokio::test]
    async fn test_create_on_miss_round_trips_through_watch() {
        let remote = Arc::new(MemoryStore::new());
        let engine = SyncEngine::new(remote.clone(), EngineConfig::default());
        engine.start();
        settle().await;

        engine.scan().begin_capture().unwrap();
        engine.scan().deliver_decode("999");
        engine.scan().resolve().await.unwrap();
        engine
            .scan()
            .create_missing("New Snack", Money::from_rupees(20))
            .await
            .unwrap();
        settle().await;

        let inventory = engine.entities().inventory();
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].barcode.as_deref(), Some("999"));
        assert!(inventory[0].is_low_stock());
        assert_eq!(engine.reporting().low_stock().len(), 1);
    }
}
