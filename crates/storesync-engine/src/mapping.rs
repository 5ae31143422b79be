//! # Document Mapping
//!
//! Normalizes loosely typed remote documents into the typed entities the
//! rest of the engine works with, and serializes entities back into wire
//! field maps for writes.
//!
//! ## Normalization Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Per-Collection Normalization                         │
//! │                                                                         │
//! │  INVENTORY / CATALOG                                                   │
//! │  ───────────────────                                                   │
//! │  • Documents with NO fields are skipped (logged, never surfaced)       │
//! │  • quantity: number or numeric string → u32, else 0                    │
//! │  • price: paise integer → Money, else zero                             │
//! │  • expirationDate: "YYYY-MM-DD" → NaiveDate, else None                 │
//! │                                                                         │
//! │  INVOICES                                                              │
//! │  ────────                                                              │
//! │  • Documents without a parseable totalValue are skipped: an invoice    │
//! │    with no total cannot participate in aggregation                     │
//! │  • createdAt: RFC 3339 → DateTime<Utc>, else None (still counted       │
//! │    toward the overall total, never inside the trailing window)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

use storesync_core::money::Money;
use storesync_core::summary::InvoiceRecord;
use storesync_core::types::{CatalogProduct, InventoryItem};
use storesync_remote::Document;

/// Wire format for expiration dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Field Helpers
// =============================================================================

fn parse_date(doc: &Document, key: &str) -> Option<NaiveDate> {
    let raw = doc.str_field(key)?;
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

fn parse_timestamp(doc: &Document, key: &str) -> Option<DateTime<Utc>> {
    let raw = doc.str_field(key)?;
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn quantity_or_zero(doc: &Document) -> u32 {
    doc.i64_field("quantity")
        .filter(|q| *q >= 0)
        .map(|q| q as u32)
        .unwrap_or(0)
}

fn price_or_zero(doc: &Document) -> Money {
    doc.i64_field("price").map(Money::from_paise).unwrap_or_default()
}

// =============================================================================
// Inventory
// =============================================================================

/// Normalizes one inventory document. Returns `None` for documents that
/// carry no fields at all (deleted-but-listed ghosts).
pub fn inventory_item_from_doc(doc: &Document) -> Option<InventoryItem> {
    if doc.is_empty() {
        warn!(id = %doc.id, "Skipping empty inventory document");
        return None;
    }

    Some(InventoryItem {
        id: doc.id.clone(),
        name: doc.string_or_empty("name"),
        quantity: quantity_or_zero(doc),
        price: price_or_zero(doc),
        expiration_date: parse_date(doc, "expirationDate"),
        category: doc.string_or_empty("category"),
        barcode: doc.str_field("barcode").map(str::to_string),
    })
}

/// Normalizes a full inventory snapshot, preserving document order.
pub fn inventory_from_docs(docs: &[Document]) -> Vec<InventoryItem> {
    docs.iter().filter_map(inventory_item_from_doc).collect()
}

/// Serializes an inventory item into wire fields. The document key is
/// carried separately and never written into the field map.
pub fn inventory_to_fields(item: &InventoryItem) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("name".into(), json!(item.name));
    fields.insert("quantity".into(), json!(item.quantity));
    fields.insert("price".into(), json!(item.price.paise()));
    fields.insert("category".into(), json!(item.category));
    if let Some(date) = item.expiration_date {
        fields.insert(
            "expirationDate".into(),
            json!(date.format(DATE_FORMAT).to_string()),
        );
    }
    if let Some(ref barcode) = item.barcode {
        fields.insert("barcode".into(), json!(barcode));
    }
    fields
}

// =============================================================================
// Catalog
// =============================================================================

/// Normalizes one catalog document. Empty documents are skipped.
pub fn catalog_product_from_doc(doc: &Document) -> Option<CatalogProduct> {
    if doc.is_empty() {
        warn!(id = %doc.id, "Skipping empty catalog document");
        return None;
    }

    let attributes: BTreeMap<String, String> = doc
        .object_field("attributes")
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default();

    Some(CatalogProduct {
        id: doc.id.clone(),
        barcode: doc.string_or_empty("barcode"),
        name: doc.string_or_empty("name"),
        description: doc.string_or_empty("description"),
        category: doc.string_or_empty("category"),
        brand: doc.string_or_empty("brand"),
        price: price_or_zero(doc),
        unit: doc.string_or_empty("unit"),
        image_url: doc.string_or_empty("imageUrl"),
        expiration_date: parse_date(doc, "expirationDate"),
        attributes,
        is_active: doc.bool_field("isActive").unwrap_or(true),
        created_at: parse_timestamp(doc, "createdAt").unwrap_or_default(),
        updated_at: parse_timestamp(doc, "updatedAt").unwrap_or_default(),
    })
}

/// Normalizes a full catalog snapshot, preserving document order.
pub fn catalog_from_docs(docs: &[Document]) -> Vec<CatalogProduct> {
    docs.iter().filter_map(catalog_product_from_doc).collect()
}

/// Serializes a catalog product into wire fields.
pub fn catalog_to_fields(product: &CatalogProduct) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("barcode".into(), json!(product.barcode));
    fields.insert("name".into(), json!(product.name));
    fields.insert("description".into(), json!(product.description));
    fields.insert("category".into(), json!(product.category));
    fields.insert("brand".into(), json!(product.brand));
    fields.insert("price".into(), json!(product.price.paise()));
    fields.insert("unit".into(), json!(product.unit));
    fields.insert("imageUrl".into(), json!(product.image_url));
    if let Some(date) = product.expiration_date {
        fields.insert(
            "expirationDate".into(),
            json!(date.format(DATE_FORMAT).to_string()),
        );
    }
    if !product.attributes.is_empty() {
        fields.insert("attributes".into(), json!(product.attributes));
    }
    fields.insert("isActive".into(), json!(product.is_active));
    fields.insert("createdAt".into(), json!(product.created_at.to_rfc3339()));
    fields.insert("updatedAt".into(), json!(product.updated_at.to_rfc3339()));
    fields
}

// =============================================================================
// Invoices
// =============================================================================

/// Extracts the aggregation slice from one invoice document.
///
/// Documents without a parseable `totalValue` are skipped; a missing
/// `createdAt` is tolerated (the record counts toward the overall total
/// but never inside the trailing window).
pub fn invoice_record_from_doc(doc: &Document) -> Option<InvoiceRecord> {
    let total = match doc.i64_field("totalValue") {
        Some(paise) => Money::from_paise(paise),
        None => {
            warn!(id = %doc.id, "Skipping invoice document without totalValue");
            return None;
        }
    };

    Some(InvoiceRecord {
        invoice_no: doc.string_or_empty("invoiceNo"),
        customer_mobile: doc.string_or_empty("customerMobile"),
        total,
        created_at: parse_timestamp(doc, "createdAt"),
    })
}

/// Extracts aggregation records from a bulk invoice read.
pub fn invoice_records_from_docs(docs: &[Document]) -> Vec<InvoiceRecord> {
    docs.iter().filter_map(invoice_record_from_doc).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_coercion_defaults() {
        let doc = Document::new("i1")
            .set("name", "Rice")
            .set("quantity", "12")
            .set("price", 5000)
            .set("category", "Groceries");

        let item = inventory_item_from_doc(&doc).unwrap();
        assert_eq!(item.quantity, 12);
        assert_eq!(item.price, Money::from_paise(5000));
        assert_eq!(item.barcode, None);
        assert_eq!(item.expiration_date, None);
    }

    #[test]
    fn test_inventory_garbage_coerces_to_zero() {
        let doc = Document::new("i2")
            .set("name", "Mystery")
            .set("quantity", "not-a-number")
            .set("expirationDate", "31-12-2026"); // wrong format

        let item = inventory_item_from_doc(&doc).unwrap();
        assert_eq!(item.quantity, 0);
        assert!(item.price.is_zero());
        assert_eq!(item.expiration_date, None);
    }

    #[test]
    fn test_empty_document_skipped() {
        let docs = vec![Document::new("ghost"), Document::new("i1").set("name", "Rice")];
        let items = inventory_from_docs(&docs);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Rice");
    }

    #[test]
    fn test_inventory_fields_round_trip() {
        let item = InventoryItem {
            id: "i1".into(),
            name: "Rice".into(),
            quantity: 3,
            price: Money::from_rupees(50),
            expiration_date: NaiveDate::from_ymd_opt(2026, 12, 31),
            category: "Groceries".into(),
            barcode: Some("8901030875021".into()),
        };

        let doc = Document::with_fields("i1", inventory_to_fields(&item));
        let back = inventory_item_from_doc(&doc).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_catalog_attributes_and_flags() {
        let doc = Document::new("p1")
            .set("barcode", "111")
            .set("name", "Shirt")
            .set("price", 99900)
            .set("attributes", json!({"color": "red", "size": "M"}))
            .set("createdAt", "2026-08-01T10:00:00Z");

        let product = catalog_product_from_doc(&doc).unwrap();
        assert_eq!(product.attributes.get("color").map(String::as_str), Some("red"));
        assert!(product.is_active); // missing flag defaults to active
        assert_eq!(product.created_at.to_rfc3339(), "2026-08-01T10:00:00+00:00");
    }

    #[test]
    fn test_invoice_without_total_skipped() {
        let docs = vec![
            Document::new("v1")
                .set("invoiceNo", "INV1-aaaa")
                .set("totalValue", 25000)
                .set("createdAt", "2026-08-25T12:00:00Z"),
            Document::new("v2").set("invoiceNo", "INV2-bbbb"),
        ];

        let records = invoice_records_from_docs(&docs);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total, Money::from_paise(25000));
        assert!(records[0].created_at.is_some());
    }

    #[test]
    fn test_invoice_missing_timestamp_tolerated() {
        let doc = Document::new("v1")
            .set("invoiceNo", "INV1-aaaa")
            .set("totalValue", 100);
        let record = invoice_record_from_doc(&doc).unwrap();
        assert_eq!(record.created_at, None);
    }
}
