//! # Billing Service
//!
//! Owns the invoice draft and the submission path.
//!
//! ## Submission Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Invoice Submission                                 │
//! │                                                                         │
//! │  submit()                                                              │
//! │  ────────                                                              │
//! │  1. Validate customer fields and finalize the draft (pure)             │
//! │  2. Serialize the invoice to its wire field map                        │
//! │  3. Issue EXACTLY ONE add() to the invoices collection                 │
//! │  4. On success: clear the draft, return invoice + message payload      │
//! │  5. On failure: the draft is UNTOUCHED — the operator retries          │
//! │     without re-entering anything, and retrying can never have          │
//! │     written a first copy (validation precedes the single write)        │
//! │                                                                         │
//! │  Invoices are append-only: there is no update or delete path here.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};
use chrono::{DateTime, Utc};
use tracing::info;

use storesync_core::invoice::{
    generate_invoice_no, Invoice, InvoiceDraft, LineInput, LineItem, StoreProfile,
};
use storesync_core::money::Money;
use storesync_core::types::{CatalogProduct, Collection, PaymentMode};
use storesync_remote::{RemoteError, RemoteStore};

use crate::error::EngineResult;

// =============================================================================
// Submission Result
// =============================================================================

/// Everything the UI needs after a successful submission.
#[derive(Debug, Clone)]
pub struct SubmittedInvoice {
    /// The immutable invoice as written.
    pub invoice: Invoice,

    /// Server-assigned document key.
    pub document_id: String,

    /// Rendered payload for the messaging collaborator.
    pub message: String,
}

// =============================================================================
// Billing Service
// =============================================================================

/// Draft assembly and invoice submission for one counter.
pub struct BillingService {
    remote: Arc<dyn RemoteStore>,
    store_profile: StoreProfile,
    draft: Mutex<InvoiceDraft>,
}

impl BillingService {
    /// Creates a service with an empty draft.
    pub fn new(remote: Arc<dyn RemoteStore>, store_profile: StoreProfile) -> Self {
        BillingService {
            remote,
            store_profile,
            draft: Mutex::new(InvoiceDraft::new()),
        }
    }

    // =========================================================================
    // Draft Assembly
    // =========================================================================

    /// Appends a manually entered line.
    pub fn add_line(&self, input: LineInput) -> EngineResult<()> {
        self.draft
            .lock()
            .expect("draft poisoned")
            .add_line(input)?;
        Ok(())
    }

    /// Appends a line prefilled from a resolved catalog product.
    pub fn add_product(&self, product: &CatalogProduct, quantity: u32) -> EngineResult<()> {
        self.add_line(LineInput {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            quantity,
        })
    }

    /// Removes the line at `index`, if present.
    pub fn remove_line(&self, index: usize) {
        self.draft.lock().expect("draft poisoned").remove_line(index);
    }

    /// Current draft lines in insertion order.
    pub fn lines(&self) -> Vec<LineItem> {
        self.draft.lock().expect("draft poisoned").lines().to_vec()
    }

    /// Current draft total.
    pub fn total(&self) -> Money {
        self.draft.lock().expect("draft poisoned").total()
    }

    /// Whether the draft has no lines.
    pub fn is_empty(&self) -> bool {
        self.draft.lock().expect("draft poisoned").is_empty()
    }

    /// Drops all draft lines.
    pub fn clear(&self) {
        self.draft.lock().expect("draft poisoned").clear();
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Finalizes the draft and writes it as one invoice document.
    ///
    /// The draft survives any failure; it is cleared only after the write
    /// succeeds.
    pub async fn submit(
        &self,
        customer_name: &str,
        customer_mobile: &str,
        payment_mode: PaymentMode,
        now: DateTime<Utc>,
    ) -> EngineResult<SubmittedInvoice> {
        // Finalize first: every validation failure happens before the write.
        let invoice = {
            let draft = self.draft.lock().expect("draft poisoned");
            draft.finalize(
                generate_invoice_no(now),
                self.store_profile.clone(),
                customer_name,
                customer_mobile,
                payment_mode,
                now,
            )?
        };

        let fields = match serde_json::to_value(&invoice)? {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(RemoteError::Serialization(format!(
                    "invoice serialized to non-object: {}",
                    other
                ))
                .into())
            }
        };

        // The single remote write.
        let document_id = self.remote.add(Collection::Invoices, fields).await?;

        self.draft.lock().expect("draft poisoned").clear();

        info!(
            invoice_no = %invoice.invoice_no,
            document_id = %document_id,
            total = %invoice.total,
            "Invoice submitted"
        );

        let message = invoice.to_message();
        Ok(SubmittedInvoice {
            invoice,
            document_id,
            message,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storesync_remote::MemoryStore;

    fn line(name: &str, rupees: i64, quantity: u32) -> LineInput {
        LineInput {
            name: name.into(),
            category: "Groceries".into(),
            price: Money::from_rupees(rupees),
            quantity,
        }
    }

    fn service() -> (Arc<MemoryStore>, BillingService) {
        let remote = Arc::new(MemoryStore::new());
        let service = BillingService::new(remote.clone(), StoreProfile::default());
        (remote, service)
    }

    #[tokio::test]
    async fn test_submit_writes_exactly_once() {
        let (remote, service) = service();
        service.add_line(line("Rice", 250, 1)).unwrap();

        let submitted = service
            .submit("Asha", "9999999999", PaymentMode::Cash, Utc::now())
            .await
            .unwrap();

        assert_eq!(remote.write_count(Collection::Invoices), 1);
        assert_eq!(submitted.invoice.total, Money::from_rupees(250));
        assert!(submitted.invoice.invoice_no.starts_with("INV"));
        assert!(service.is_empty()); // draft cleared after the write

        let docs = remote.list(Collection::Invoices).await.unwrap();
        assert_eq!(docs[0].id, submitted.document_id);
        assert_eq!(docs[0].raw("totalValue"), Some(&json!(25000)));
        assert_eq!(docs[0].str_field("customerName"), Some("Asha"));
        assert_eq!(docs[0].str_field("modeOfPayment"), Some("cash"));
    }

    #[tokio::test]
    async fn test_failed_submit_preserves_draft() {
        let (remote, service) = service();
        service.add_line(line("Rice", 250, 1)).unwrap();

        remote.set_offline(true);
        let err = service
            .submit("Asha", "9999999999", PaymentMode::Cash, Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(remote.write_count(Collection::Invoices), 0);
        assert_eq!(service.lines().len(), 1); // nothing lost

        // Retry after connectivity returns: still exactly one write
        remote.set_offline(false);
        service
            .submit("Asha", "9999999999", PaymentMode::Cash, Utc::now())
            .await
            .unwrap();
        assert_eq!(remote.write_count(Collection::Invoices), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_never_writes() {
        let (remote, service) = service();
        service.add_line(line("Rice", 250, 1)).unwrap();

        // Missing customer name
        assert!(service
            .submit("", "9999999999", PaymentMode::Cash, Utc::now())
            .await
            .is_err());
        // Short mobile
        assert!(service
            .submit("Asha", "12345", PaymentMode::Cash, Utc::now())
            .await
            .is_err());
        assert_eq!(remote.write_count(Collection::Invoices), 0);
        assert_eq!(service.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_draft_cannot_submit() {
        let (remote, service) = service();
        assert!(service
            .submit("Asha", "9999999999", PaymentMode::Cash, Utc::now())
            .await
            .is_err());
        assert_eq!(remote.write_count(Collection::Invoices), 0);
    }

    #[tokio::test]
    async fn test_invoice_numbers_are_unique() {
        let (_remote, service) = service();
        let now = Utc::now();

        service.add_line(line("Rice", 50, 1)).unwrap();
        let first = service
            .submit("Asha", "9999999999", PaymentMode::Cash, now)
            .await
            .unwrap();

        service.add_line(line("Sugar", 40, 2)).unwrap();
        let second = service
            .submit("Ravi", "8888888888", PaymentMode::Card, now)
            .await
            .unwrap();

        // Same millisecond, still distinct numbers
        assert_ne!(first.invoice.invoice_no, second.invoice.invoice_no);
    }

    #[tokio::test]
    async fn test_add_product_prefills_line() {
        let (_remote, service) = service();
        let product = CatalogProduct {
            id: "p1".into(),
            barcode: "111".into(),
            name: "Basmati Rice".into(),
            description: String::new(),
            category: "Groceries".into(),
            brand: String::new(),
            price: Money::from_rupees(120),
            unit: "kg".into(),
            image_url: String::new(),
            expiration_date: None,
            attributes: Default::default(),
            is_active: true,
            created_at: Default::default(),
            updated_at: Default::default(),
        };

        service.add_product(&product, 2).unwrap();
        assert_eq!(service.total(), Money::from_rupees(240));
        assert_eq!(service.lines()[0].name, "Basmati Rice");
    }
}
