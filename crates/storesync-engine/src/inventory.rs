//! # Inventory Service
//!
//! Write paths for the inventory collection. Reads never happen here: the
//! inventory watch delivers every change back through the entity store, so
//! a successful write is observed the same way regardless of which device
//! made it.

use std::sync::Arc;
use tracing::info;

use storesync_core::types::{Collection, InventoryItem};
use storesync_core::validation::{validate_barcode, validate_required};
use storesync_remote::RemoteStore;

use crate::error::EngineResult;
use crate::mapping::inventory_to_fields;

/// Inventory CRUD against the remote store.
pub struct InventoryService {
    remote: Arc<dyn RemoteStore>,
}

impl InventoryService {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        InventoryService { remote }
    }

    fn validate(item: &InventoryItem) -> EngineResult<()> {
        validate_required("item name", &item.name)?;
        if let Some(ref barcode) = item.barcode {
            validate_barcode(barcode)?;
        }
        Ok(())
    }

    /// Creates an inventory item. The `id` on the input is ignored; the
    /// server-assigned key is returned.
    pub async fn add_item(&self, item: &InventoryItem) -> EngineResult<String> {
        Self::validate(item)?;
        let id = self
            .remote
            .add(Collection::Inventory, inventory_to_fields(item))
            .await?;
        info!(id = %id, name = %item.name, "Inventory item added");
        Ok(id)
    }

    /// Replaces an existing item's fields.
    pub async fn update_item(&self, item: &InventoryItem) -> EngineResult<()> {
        Self::validate(item)?;
        self.remote
            .update(Collection::Inventory, &item.id, inventory_to_fields(item))
            .await?;
        info!(id = %item.id, name = %item.name, "Inventory item updated");
        Ok(())
    }

    /// Deletes an item by document key.
    pub async fn delete_item(&self, id: &str) -> EngineResult<()> {
        self.remote.delete(Collection::Inventory, id).await?;
        info!(id = %id, "Inventory item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storesync_core::money::Money;
    use storesync_remote::MemoryStore;

    fn item(name: &str, qty: u32) -> InventoryItem {
        InventoryItem {
            id: String::new(),
            name: name.into(),
            quantity: qty,
            price: Money::from_rupees(50),
            expiration_date: None,
            category: "Groceries".into(),
            barcode: None,
        }
    }

    #[tokio::test]
    async fn test_add_update_delete() {
        let remote = Arc::new(MemoryStore::new());
        let service = InventoryService::new(remote.clone());

        let id = service.add_item(&item("Rice", 10)).await.unwrap();

        let mut updated = item("Rice", 8);
        updated.id = id.clone();
        service.update_item(&updated).await.unwrap();

        let docs = remote.list(Collection::Inventory).await.unwrap();
        assert_eq!(docs[0].i64_field("quantity"), Some(8));

        service.delete_item(&id).await.unwrap();
        assert!(remote.list(Collection::Inventory).await.unwrap().is_empty());
        assert_eq!(remote.write_count(Collection::Inventory), 3);
    }

    #[tokio::test]
    async fn test_blank_name_rejected_before_write() {
        let remote = Arc::new(MemoryStore::new());
        let service = InventoryService::new(remote.clone());

        assert!(service.add_item(&item("   ", 1)).await.is_err());
        assert_eq!(remote.write_count(Collection::Inventory), 0);
    }
}
