//! # Domain Types
//!
//! Core domain types used throughout StoreSync.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ InventoryItem   │   │ CatalogProduct  │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (doc key)   │   │  id (doc key)   │   │  invoice_no     │       │
//! │  │  name           │   │  barcode        │   │  customer       │       │
//! │  │  quantity       │   │  name, brand    │   │  lines          │       │
//! │  │  price (Money)  │   │  price (Money)  │   │  total (Money)  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   Collection    │   │  PaymentMode    │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  Inventory      │   │  Cash           │                             │
//! │  │  Products       │   │  Card           │                             │
//! │  │  Invoices       │   │  Transfer       │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership Model
//! Entities are owned exclusively by the remote document store. The local
//! entity store holds a read-through cache with no independent lifetime:
//! a live subscription is the sole writer to the cached sets.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Collection
// =============================================================================

/// The remote collections this system watches and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Stocked items for the inventory screen.
    Inventory,
    /// The product catalog (barcode lookups resolve against this).
    Products,
    /// Submitted invoices. Append-only.
    Invoices,
}

impl Collection {
    /// Remote collection name as stored server-side.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Collection::Inventory => "inventory",
            Collection::Products => "products",
            Collection::Invoices => "invoices",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Mode
// =============================================================================

/// How the customer settles an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Bank/app transfer.
    Transfer,
}

impl Default for PaymentMode {
    fn default() -> Self {
        PaymentMode::Cash
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMode::Cash => write!(f, "Cash"),
            PaymentMode::Card => write!(f, "Card"),
            PaymentMode::Transfer => write!(f, "Transfer"),
        }
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A stocked item, normalized from a loosely typed remote document.
///
/// ## Lifecycle
/// Created by explicit add or the barcode create-on-miss flow; mutated by
/// edit; destroyed by explicit delete. The local copy always reflects the
/// most recent snapshot delivered by the inventory subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryItem {
    /// Remote document key.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Units in stock. Coerced to 0 when the remote value is missing or
    /// unparseable.
    pub quantity: u32,

    /// Unit price.
    pub price: Money,

    /// Expiration date, when the remote document carries a parseable one.
    #[ts(as = "Option<String>")]
    pub expiration_date: Option<NaiveDate>,

    /// Free-form category label.
    pub category: String,

    /// Barcode, when the item was created from a scan.
    pub barcode: Option<String>,
}

impl InventoryItem {
    /// Whether this item counts as low stock on the dashboard.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity < crate::LOW_STOCK_THRESHOLD
    }
}

// =============================================================================
// Catalog Product
// =============================================================================

/// A catalog entry, looked up (read-only) by the barcode workflow.
///
/// Barcodes should be unique within the catalog but uniqueness is not
/// enforced; lookups take the first match in delivered document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogProduct {
    /// Remote document key.
    pub id: String,

    /// Scannable barcode (EAN-13, UPC-A, etc.).
    pub barcode: String,

    /// Display name.
    pub name: String,

    /// Longer description for the detail view.
    pub description: String,

    /// Free-form category label.
    pub category: String,

    /// Brand name.
    pub brand: String,

    /// Unit price.
    pub price: Money,

    /// Unit label ("kg", "pack", "piece").
    pub unit: String,

    /// Image reference for the catalog UI.
    pub image_url: String,

    /// Expiration date, when present and parseable.
    #[ts(as = "Option<String>")]
    pub expiration_date: Option<NaiveDate>,

    /// Free-form attribute map (e.g., "color" → "red").
    pub attributes: BTreeMap<String, String>,

    /// Soft-delete flag.
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CatalogProduct {
    /// Case-insensitive match against name or barcode, as typed in the
    /// catalog search box.
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q) || self.barcode.to_lowercase().contains(&q)
    }
}

// =============================================================================
// Catalog Filtering
// =============================================================================

/// Filters a catalog snapshot by search text and selected categories.
///
/// Deactivated products are always excluded. An empty query matches
/// everything; an empty category selection matches every category.
pub fn filter_catalog<'a>(
    products: &'a [CatalogProduct],
    query: &str,
    categories: &[String],
) -> Vec<&'a CatalogProduct> {
    products
        .iter()
        .filter(|p| p.is_active)
        .filter(|p| query.is_empty() || p.matches_search(query))
        .filter(|p| categories.is_empty() || categories.contains(&p.category))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, barcode: &str, category: &str) -> CatalogProduct {
        CatalogProduct {
            id: "p1".into(),
            barcode: barcode.into(),
            name: name.into(),
            description: String::new(),
            category: category.into(),
            brand: String::new(),
            price: Money::from_rupees(10),
            unit: "pack".into(),
            image_url: String::new(),
            expiration_date: None,
            attributes: BTreeMap::new(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::Inventory.as_str(), "inventory");
        assert_eq!(Collection::Products.as_str(), "products");
        assert_eq!(Collection::Invoices.as_str(), "invoices");
    }

    #[test]
    fn test_payment_mode_display() {
        assert_eq!(PaymentMode::Transfer.to_string(), "Transfer");
        assert_eq!(PaymentMode::default(), PaymentMode::Cash);
    }

    #[test]
    fn test_low_stock() {
        let item = InventoryItem {
            id: "i1".into(),
            name: "Rice".into(),
            quantity: 4,
            price: Money::from_rupees(50),
            expiration_date: None,
            category: "Groceries".into(),
            barcode: None,
        };
        assert!(item.is_low_stock());
    }

    #[test]
    fn test_matches_search() {
        let p = product("Basmati Rice", "8901030875021", "Groceries");
        assert!(p.matches_search("rice"));
        assert!(p.matches_search("8901030"));
        assert!(!p.matches_search("sugar"));
    }

    #[test]
    fn test_filter_catalog() {
        let items = vec![
            product("Rice", "111", "Groceries"),
            product("Soap", "222", "Household"),
        ];
        let all = filter_catalog(&items, "", &[]);
        assert_eq!(all.len(), 2);

        let groceries = filter_catalog(&items, "", &["Groceries".to_string()]);
        assert_eq!(groceries.len(), 1);
        assert_eq!(groceries[0].name, "Rice");

        let by_barcode = filter_catalog(&items, "222", &[]);
        assert_eq!(by_barcode.len(), 1);
        assert_eq!(by_barcode[0].name, "Soap");
    }

    #[test]
    fn test_filter_catalog_excludes_deactivated() {
        let mut deleted = product("Rice", "111", "Groceries");
        deleted.is_active = false;
        let items = vec![deleted, product("Soap", "222", "Household")];

        let all = filter_catalog(&items, "", &[]);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Soap");

        // Not even a direct barcode search surfaces it
        assert!(filter_catalog(&items, "111", &[]).is_empty());
    }
}
