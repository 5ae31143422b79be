//! # Invoice Assembly
//!
//! Draft assembly, totalling, and payload formatting for invoices.
//!
//! ## Invoice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Invoice Lifecycle                                  │
//! │                                                                         │
//! │  Counter Action            Draft Operation         State Change         │
//! │  ──────────────            ───────────────         ────────────         │
//! │                                                                         │
//! │  Add product ─────────────► add_line() ──────────► lines.push(line)    │
//! │                                                                         │
//! │  Review bill ─────────────► total() ─────────────► (read only, Σ)      │
//! │                                                                         │
//! │  Confirm ─────────────────► finalize() ──────────► Invoice (frozen)    │
//! │                                                                         │
//! │  One remote write later, the Invoice is immutable: no update or        │
//! │  delete path exists. Failed writes leave the draft untouched so the    │
//! │  cashier can retry without re-entering lines.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Value Freezing
//! A line's value is computed ONCE when the line is added
//! (`price × quantity`) and never recomputed on read. The draft total, by
//! contrast, is recomputed on every read so it always agrees with the
//! current line set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::PaymentMode;
use crate::validation::{validate_mobile, validate_price, validate_quantity, validate_required};
use crate::{MAX_INVOICE_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Store Profile
// =============================================================================

/// Static store metadata embedded into every invoice and payload header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoreProfile {
    /// Store display name.
    pub name: String,
    /// Street address printed on the bill.
    pub address: String,
    /// Store contact number.
    pub contact: String,
}

impl Default for StoreProfile {
    fn default() -> Self {
        StoreProfile {
            name: "StoreSync Mart".to_string(),
            address: "123 Main St, City, State".to_string(),
            contact: "+91-9876543210".to_string(),
        }
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// Input for one line on the invoice draft, as entered or prefilled from a
/// barcode scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineInput {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub quantity: u32,
}

/// One product-quantity-price tuple within an invoice.
///
/// `value` is frozen at assembly time; it is never recomputed on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub quantity: u32,
    /// `price × quantity`, computed once in `add_line`.
    pub value: Money,
}

// =============================================================================
// Invoice Draft
// =============================================================================

/// The pending invoice being assembled at the counter.
///
/// ## Invariants
/// - Insertion order is preserved
/// - No dedup: adding the same product twice yields two lines (intentional,
///   supports split pricing)
/// - `total()` always equals the sum of current line values
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceDraft {
    lines: Vec<LineItem>,
}

impl InvoiceDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        InvoiceDraft { lines: Vec::new() }
    }

    /// Appends a validated line to the draft.
    ///
    /// ## Rules
    /// - name and category must be non-empty
    /// - price and quantity must be positive
    /// - quantity must not exceed MAX_LINE_QUANTITY
    /// - the draft must stay within MAX_INVOICE_LINES
    ///
    /// ## Example
    /// ```rust
    /// use storesync_core::invoice::{InvoiceDraft, LineInput};
    /// use storesync_core::money::Money;
    ///
    /// let mut draft = InvoiceDraft::new();
    /// draft.add_line(LineInput {
    ///     name: "Rice".into(),
    ///     category: "Groceries".into(),
    ///     price: Money::from_rupees(50),
    ///     quantity: 2,
    /// }).unwrap();
    /// assert_eq!(draft.total().paise(), 10000); // ₹100.00
    /// ```
    pub fn add_line(&mut self, input: LineInput) -> CoreResult<()> {
        validate_required("product name", &input.name)?;
        validate_required("category", &input.category)?;
        validate_price(input.price)?;
        validate_quantity(input.quantity)?;

        if input.quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: input.quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        if self.lines.len() >= MAX_INVOICE_LINES {
            return Err(CoreError::DraftTooLarge {
                max: MAX_INVOICE_LINES,
            });
        }

        let value = input.price.multiply_quantity(input.quantity);
        self.lines.push(LineItem {
            name: input.name.trim().to_string(),
            category: input.category.trim().to_string(),
            price: input.price,
            quantity: input.quantity,
            value,
        });

        Ok(())
    }

    /// Removes the line at `index`, if present.
    pub fn remove_line(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// Current lines in insertion order.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Number of lines on the draft.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether the draft has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum over current line values.
    ///
    /// Recomputed on every read (never cached) so it is always consistent
    /// with the current line set.
    pub fn total(&self) -> Money {
        self.lines.iter().map(|l| l.value).sum()
    }

    /// Drops all lines, returning the draft to its initial state.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Freezes the draft into an immutable [`Invoice`].
    ///
    /// ## Preconditions
    /// - customer name non-empty
    /// - customer mobile non-empty with at least 10 digits
    /// - at least one line
    ///
    /// The draft itself is not consumed or cleared; the caller clears it
    /// after the remote write succeeds so a failed write can be retried
    /// without re-entering data.
    pub fn finalize(
        &self,
        invoice_no: String,
        store: StoreProfile,
        customer_name: &str,
        customer_mobile: &str,
        payment_mode: PaymentMode,
        created_at: DateTime<Utc>,
    ) -> CoreResult<Invoice> {
        validate_required("customer name", customer_name)?;
        validate_mobile(customer_mobile)?;

        if self.lines.is_empty() {
            return Err(CoreError::EmptyInvoice);
        }

        if invoice_no.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "invoice number".to_string(),
            }
            .into());
        }

        Ok(Invoice {
            invoice_no,
            store,
            customer_name: customer_name.trim().to_string(),
            customer_mobile: customer_mobile.trim().to_string(),
            lines: self.lines.clone(),
            total: self.total(),
            payment_mode,
            created_at,
        })
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A finalized invoice. Immutable once submitted.
///
/// Serialized field names match the remote document layout
/// (`invoiceNo`, `products`, `totalValue`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Invoice {
    pub invoice_no: String,
    pub store: StoreProfile,
    pub customer_name: String,
    pub customer_mobile: String,
    /// Ordered line items, named `products` on the wire.
    #[serde(rename = "products")]
    pub lines: Vec<LineItem>,
    /// Sum of line values, frozen at finalize time.
    #[serde(rename = "totalValue")]
    pub total: Money,
    #[serde(rename = "modeOfPayment")]
    pub payment_mode: PaymentMode,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Renders the outbound message payload for the messaging collaborator.
    ///
    /// ## Format
    /// ```text
    /// *StoreSync Mart*
    /// 123 Main St, City, State
    /// Contact: +91-9876543210
    /// Invoice No: INV1756166400000-a3f1
    /// Customer: Asha (9999999999)
    /// Date: 26/08/2026
    ///
    /// *Products:*
    /// Rice (Groceries) x2 @ ₹50.00 = ₹100.00
    ///
    /// *Total: ₹100.00*
    /// Payment: Cash
    /// ```
    pub fn to_message(&self) -> String {
        let mut msg = String::new();

        msg.push_str(&format!("*{}*\n", self.store.name));
        msg.push_str(&format!("{}\n", self.store.address));
        msg.push_str(&format!("Contact: {}\n", self.store.contact));
        msg.push_str(&format!("Invoice No: {}\n", self.invoice_no));
        msg.push_str(&format!(
            "Customer: {} ({})\n",
            self.customer_name, self.customer_mobile
        ));
        msg.push_str(&format!("Date: {}\n", self.created_at.format("%d/%m/%Y")));

        msg.push_str("\n*Products:*\n");
        for line in &self.lines {
            msg.push_str(&format!(
                "{} ({}) x{} @ {} = {}\n",
                line.name, line.category, line.quantity, line.price, line.value
            ));
        }

        msg.push_str(&format!("\n*Total: {}*\n", self.total));
        msg.push_str(&format!("Payment: {}", self.payment_mode));

        msg
    }
}

// =============================================================================
// Invoice Number Generation
// =============================================================================

/// Generates an invoice number: `INV<unix-millis>-<4 hex>`.
///
/// The millisecond prefix keeps numbers time-sortable; the random suffix
/// (drawn from a UUID v4) keeps two rapid submissions from colliding.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use storesync_core::invoice::generate_invoice_no;
///
/// let no = generate_invoice_no(Utc::now());
/// assert!(no.starts_with("INV"));
/// assert_eq!(no.split('-').count(), 2);
/// ```
pub fn generate_invoice_no(now: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("INV{}-{}", now.timestamp_millis(), &suffix[..4])
}

// =============================================================================
// Unit Tests
// =============================================================================
