//! Inventory service - grants and per-user listings
//!
//! Listing joins local inventory rows with the catalog's item data, fetched
//! through the remote client. Granting is a two-branch upsert keyed on
//! `(user_id, catalog_item_id)`.

use std::collections::HashMap;
use std::sync::Arc;

use play_domain::constants::CATALOG_ITEMS_ROUTE;
use play_domain::{
    CatalogItemDto, GrantItemsDto, InventoryItem, InventoryItemDto, PlayError, Result,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::remote::ports::RemoteCollectionClient;
use crate::repository::filter::Filter;
use crate::repository::ports::Repository;

/// Inventory service
pub struct InventoryService {
    items: Arc<dyn Repository<InventoryItem>>,
    catalog: Arc<dyn RemoteCollectionClient<CatalogItemDto>>,
}

impl InventoryService {
    pub fn new(
        items: Arc<dyn Repository<InventoryItem>>,
        catalog: Arc<dyn RemoteCollectionClient<CatalogItemDto>>,
    ) -> Self {
        Self { items, catalog }
    }

    /// Everything `user_id` owns, joined with catalog names and descriptions.
    ///
    /// # Errors
    /// - `Validation` for a nil user id
    /// - `RemoteCallFailed` / `CircuitOpen` from the catalog client
    /// - `Internal` when an owned item is missing from the catalog
    #[instrument(skip(self))]
    pub async fn items_for_user(&self, user_id: Uuid) -> Result<Vec<InventoryItemDto>> {
        if user_id.is_nil() {
            return Err(PlayError::Validation("userId must not be empty".to_string()));
        }

        let catalog_items = self.catalog.fetch_collection(CATALOG_ITEMS_ROUTE).await?;
        let owned = self.items.get_all_matching(&owned_by(user_id)).await?;
        debug!(catalog = catalog_items.len(), owned = owned.len(), "joining inventory");

        let by_id: HashMap<Uuid, &CatalogItemDto> =
            catalog_items.iter().map(|item| (item.id, item)).collect();

        owned
            .iter()
            .map(|row| {
                by_id.get(&row.catalog_item_id).map(|item| row.to_dto(item)).ok_or_else(|| {
                    PlayError::Internal(format!(
                        "catalog item {} owned by user {} is missing from the catalog",
                        row.catalog_item_id, user_id
                    ))
                })
            })
            .collect()
    }

    /// Add `quantity` of an item to a user's inventory.
    ///
    /// Updates the existing row when the user already owns the item,
    /// otherwise creates one.
    #[instrument(skip(self, grant), fields(user_id = %grant.user_id, catalog_item_id = %grant.catalog_item_id))]
    pub async fn grant(&self, grant: GrantItemsDto) -> Result<()> {
        let filter = owned_by(grant.user_id).and(Filter::labelled(
            "catalog_item_id",
            move |row: &InventoryItem| row.catalog_item_id == grant.catalog_item_id,
        ));

        match self.items.find(&filter).await? {
            Some(mut row) => {
                row.quantity = row.quantity.saturating_add(grant.quantity);
                info!(quantity = row.quantity, "inventory quantity increased");
                self.items.update(row).await
            }
            None => {
                let row =
                    InventoryItem::granted(grant.user_id, grant.catalog_item_id, grant.quantity);
                info!(inventory_item_id = %row.id, quantity = row.quantity, "inventory item granted");
                self.items.create(row).await
            }
        }
    }
}

fn owned_by(user_id: Uuid) -> Filter<InventoryItem> {
    Filter::labelled("user_id", move |row: &InventoryItem| row.user_id == user_id)
}
