//! # Reporting Service
//!
//! Dashboard queries: the sales summary with its naive forecast, the
//! recent-invoice list, and the low-stock card.
//!
//! Invoices are deliberately bulk-read per query rather than watched: the
//! dashboard refreshes on demand and the invoice set only grows, so a
//! standing subscription would buy nothing but memory.

use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use storesync_core::summary::{compute_summary, InvoiceRecord, SalesSummary};
use storesync_core::types::{Collection, InventoryItem};
use storesync_remote::RemoteStore;

use crate::config::ReportingSettings;
use crate::error::EngineResult;
use crate::mapping::invoice_records_from_docs;
use crate::store::EntityStore;

/// Read-only reporting over invoices and the cached inventory.
pub struct ReportingService {
    remote: Arc<dyn RemoteStore>,
    entities: Arc<EntityStore>,
    settings: ReportingSettings,
}

impl ReportingService {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        entities: Arc<EntityStore>,
        settings: ReportingSettings,
    ) -> Self {
        ReportingService {
            remote,
            entities,
            settings,
        }
    }

    /// Bulk-reads all invoices and aggregates them in one pass.
    pub async fn sales_summary(&self, now: DateTime<Utc>) -> EngineResult<SalesSummary> {
        let docs = self.remote.list(Collection::Invoices).await?;
        let records = invoice_records_from_docs(&docs);
        debug!(
            documents = docs.len(),
            records = records.len(),
            "Computing sales summary"
        );
        Ok(compute_summary(&records, now))
    }

    /// Invoices created inside the configured recent window, newest first.
    ///
    /// The bound is inclusive: an invoice at exactly the window edge is
    /// still recent. Records without a parseable timestamp cannot be
    /// placed in the window and are excluded.
    pub async fn recent_invoices(&self, now: DateTime<Utc>) -> EngineResult<Vec<InvoiceRecord>> {
        let window = Duration::hours(self.settings.recent_invoice_window_hours);
        let docs = self.remote.list(Collection::Invoices).await?;

        let mut recent: Vec<InvoiceRecord> = invoice_records_from_docs(&docs)
            .into_iter()
            .filter(|r| matches!(r.created_at, Some(created) if now - created <= window))
            .collect();

        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recent)
    }

    /// Cached inventory items under the low-stock threshold.
    pub fn low_stock(&self) -> Vec<InventoryItem> {
        let inventory = self.entities.inventory();
        storesync_core::summary::low_stock(&inventory)
            .into_iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storesync_core::money::Money;
    use storesync_remote::{Document, MemoryStore};

    fn invoice_doc(no: &str, paise: i64, created: Option<DateTime<Utc>>) -> Document {
        let mut doc = Document::new(format!("v-{no}"))
            .set("invoiceNo", no)
            .set("customerMobile", "9999999999")
            .set("totalValue", paise);
        if let Some(ts) = created {
            doc = doc.set("createdAt", ts.to_rfc3339());
        }
        doc
    }

    fn service(remote: Arc<MemoryStore>) -> ReportingService {
        ReportingService::new(
            remote,
            Arc::new(EntityStore::new()),
            ReportingSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_summary_over_bulk_read() {
        let now = Utc::now();
        let remote = Arc::new(MemoryStore::new());
        remote.seed(
            Collection::Invoices,
            vec![
                invoice_doc("INV1-aaaa", 10000, Some(now - Duration::days(1))),
                invoice_doc("INV2-bbbb", 20000, Some(now - Duration::days(10))),
                invoice_doc("INV3-cccc", 5000, None), // legacy, no timestamp
            ],
        );

        let summary = service(remote).sales_summary(now).await.unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total, Money::from_paise(35000));
        assert_eq!(summary.last_seven_days, Money::from_paise(10000));
    }

    #[tokio::test]
    async fn test_recent_invoices_window_and_order() {
        let now = Utc::now();
        let remote = Arc::new(MemoryStore::new());
        remote.seed(
            Collection::Invoices,
            vec![
                invoice_doc("INV1-aaaa", 100, Some(now - Duration::hours(40))),
                invoice_doc("INV2-bbbb", 200, Some(now - Duration::hours(50))), // outside 48h
                invoice_doc("INV3-cccc", 300, Some(now - Duration::hours(1))),
                invoice_doc("INV4-dddd", 400, None), // unplaceable
            ],
        );

        let recent = service(remote).recent_invoices(now).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].invoice_no, "INV3-cccc"); // newest first
        assert_eq!(recent[1].invoice_no, "INV1-aaaa");
    }

    #[tokio::test]
    async fn test_recent_invoices_window_edge_is_inclusive() {
        let now = Utc::now();
        let remote = Arc::new(MemoryStore::new());
        remote.seed(
            Collection::Invoices,
            vec![invoice_doc("INV1-aaaa", 100, Some(now - Duration::hours(48)))],
        );

        let recent = service(remote).recent_invoices(now).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].invoice_no, "INV1-aaaa");
    }

    #[tokio::test]
    async fn test_low_stock_reads_cached_inventory() {
        let remote = Arc::new(MemoryStore::new());
        let entities = Arc::new(EntityStore::new());
        entities.replace_inventory(vec![
            InventoryItem {
                id: "i1".into(),
                name: "Rice".into(),
                quantity: 2,
                price: Money::from_rupees(50),
                expiration_date: None,
                category: "Groceries".into(),
                barcode: None,
            },
            InventoryItem {
                id: "i2".into(),
                name: "Sugar".into(),
                quantity: 20,
                price: Money::from_rupees(40),
                expiration_date: None,
                category: "Groceries".into(),
                barcode: None,
            },
        ]);

        let reporting =
            ReportingService::new(remote, entities, ReportingSettings::default());
        let low = reporting.low_stock();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Rice");
    }

    #[tokio::test]
    async fn test_offline_summary_is_retryable() {
        let remote = Arc::new(MemoryStore::new());
        remote.set_offline(true);
        let err = service(remote).sales_summary(Utc::now()).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
