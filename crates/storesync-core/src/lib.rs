//! # storesync-core: Pure Business Logic for StoreSync
//!
//! This crate is the **heart** of StoreSync. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       StoreSync Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Mobile Frontend (TypeScript)                   │   │
//! │  │   Inventory UI ──► Catalog UI ──► Scanner UI ──► Billing UI    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  storesync-engine (orchestration)               │   │
//! │  │   subscriptions, barcode workflow, billing, reporting          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ storesync-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  invoice  │  │  summary  │  │   │
//! │  │   │ Inventory │  │   Money   │  │   Draft   │  │   Sales   │  │   │
//! │  │   │  Catalog  │  │  (paise)  │  │  LineItem │  │  Forecast │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO REMOTE STORE • NO NETWORK • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InventoryItem, CatalogProduct, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`invoice`] - Invoice draft assembly, totalling, payload formatting
//! - [`summary`] - Sales summary and naive forecast math
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Remote store, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod money;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use storesync_core::Money` instead of
// `use storesync_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{Invoice, InvoiceDraft, LineInput, LineItem, StoreProfile};
pub use money::Money;
pub use summary::{InvoiceRecord, SalesSummary};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed on a single invoice draft
///
/// ## Business Reason
/// Prevents runaway drafts and keeps the outbound message payload within
/// what messaging channels accept.
pub const MAX_INVOICE_LINES: usize = 100;

/// Maximum quantity of a single line item
///
/// ## Business Reason
/// Prevents accidental over-billing (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: u32 = 9999;

/// Inventory quantity below which an item counts as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 5;
