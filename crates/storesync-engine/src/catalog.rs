//! # Catalog Service
//!
//! Write paths for the product catalog, plus attribute-form collection.
//!
//! ## Attribute Pairs
//! The product form presents free key/value rows. A row with both cells
//! blank is simply unused; a row with exactly one cell filled is operator
//! error and rejects the whole submission.

use std::sync::Arc;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::info;

use storesync_core::types::{CatalogProduct, Collection};
use storesync_core::validation::{
    validate_attribute_pair, validate_barcode, validate_price, validate_required,
};
use storesync_remote::RemoteStore;

use crate::error::EngineResult;
use crate::mapping::catalog_to_fields;

/// Collects form attribute rows into a validated map.
///
/// Fully blank rows are skipped; half-filled rows fail validation.
pub fn collect_attributes(pairs: &[(String, String)]) -> EngineResult<BTreeMap<String, String>> {
    let mut attributes = BTreeMap::new();
    for (key, value) in pairs {
        validate_attribute_pair(key, value)?;
        if !key.trim().is_empty() {
            attributes.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    Ok(attributes)
}

/// Catalog CRUD against the remote store.
pub struct CatalogService {
    remote: Arc<dyn RemoteStore>,
}

impl CatalogService {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        CatalogService { remote }
    }

    fn validate(product: &CatalogProduct) -> EngineResult<()> {
        validate_required("product name", &product.name)?;
        validate_required("barcode", &product.barcode)?;
        validate_barcode(&product.barcode)?;
        validate_price(product.price)?;
        Ok(())
    }

    /// Creates a catalog product, stamping both timestamps with `now`.
    /// The `id` on the input is ignored; the server-assigned key is
    /// returned.
    pub async fn add_product(
        &self,
        product: &CatalogProduct,
        now: DateTime<Utc>,
    ) -> EngineResult<String> {
        Self::validate(product)?;

        let mut stamped = product.clone();
        stamped.created_at = now;
        stamped.updated_at = now;

        let id = self
            .remote
            .add(Collection::Products, catalog_to_fields(&stamped))
            .await?;
        info!(id = %id, barcode = %stamped.barcode, "Catalog product added");
        Ok(id)
    }

    /// Replaces an existing product's fields, touching `updated_at`.
    pub async fn update_product(
        &self,
        product: &CatalogProduct,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        Self::validate(product)?;

        let mut stamped = product.clone();
        stamped.updated_at = now;

        self.remote
            .update(Collection::Products, &stamped.id, catalog_to_fields(&stamped))
            .await?;
        info!(id = %stamped.id, "Catalog product updated");
        Ok(())
    }

    /// Soft-deletes a product by clearing its active flag. Inactive
    /// products are invisible to barcode resolution and catalog filtering;
    /// only the raw document remains.
    pub async fn deactivate_product(
        &self,
        product: &CatalogProduct,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        let mut inactive = product.clone();
        inactive.is_active = false;
        self.update_product(&inactive, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storesync_core::money::Money;
    use storesync_remote::MemoryStore;

    fn product(barcode: &str, name: &str) -> CatalogProduct {
        CatalogProduct {
            id: String::new(),
            barcode: barcode.into(),
            name: name.into(),
            description: "desc".into(),
            category: "Groceries".into(),
            brand: "Acme".into(),
            price: Money::from_rupees(100),
            unit: "pack".into(),
            image_url: String::new(),
            expiration_date: None,
            attributes: BTreeMap::new(),
            is_active: true,
            created_at: Default::default(),
            updated_at: Default::default(),
        }
    }

    #[test]
    fn test_collect_attributes() {
        let pairs = vec![
            ("color".to_string(), "red".to_string()),
            ("".to_string(), "".to_string()), // unused row
        ];
        let attrs = collect_attributes(&pairs).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("color").map(String::as_str), Some("red"));

        // Half-filled row rejects the submission
        let bad = vec![("size".to_string(), "".to_string())];
        assert!(collect_attributes(&bad).is_err());
    }

    #[tokio::test]
    async fn test_add_stamps_timestamps() {
        let remote = Arc::new(MemoryStore::new());
        let service = CatalogService::new(remote.clone());
        let now = Utc::now();

        let id = service.add_product(&product("111", "Soap"), now).await.unwrap();

        let docs = remote.list(Collection::Products).await.unwrap();
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].str_field("createdAt"), Some(now.to_rfc3339().as_str()));
        assert_eq!(docs[0].bool_field("isActive"), Some(true));
    }

    #[tokio::test]
    async fn test_deactivate_is_soft_delete() {
        let remote = Arc::new(MemoryStore::new());
        let service = CatalogService::new(remote.clone());
        let now = Utc::now();

        let id = service.add_product(&product("111", "Soap"), now).await.unwrap();
        let mut existing = product("111", "Soap");
        existing.id = id;

        service.deactivate_product(&existing, now).await.unwrap();

        let docs = remote.list(Collection::Products).await.unwrap();
        assert_eq!(docs.len(), 1); // still listed
        assert_eq!(docs[0].bool_field("isActive"), Some(false));
    }

    #[tokio::test]
    async fn test_zero_price_rejected() {
        let remote = Arc::new(MemoryStore::new());
        let service = CatalogService::new(remote.clone());

        let mut free = product("111", "Freebie");
        free.price = Money::zero();
        assert!(service.add_product(&free, Utc::now()).await.is_err());
        assert_eq!(remote.write_count(Collection::Products), 0);
    }
}
