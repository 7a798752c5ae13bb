//! Inventory entities and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::Entity;

/// Quantity of one catalog item owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub catalog_item_id: Uuid,
    pub quantity: i32,
    pub acquired_date: DateTime<Utc>,
}

impl Entity for InventoryItem {
    type Key = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }
}

impl InventoryItem {
    /// Row for a first grant, acquired now.
    pub fn granted(user_id: Uuid, catalog_item_id: Uuid, quantity: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            catalog_item_id,
            quantity,
            acquired_date: Utc::now(),
        }
    }

    /// Join with the catalog's view of the item.
    pub fn to_dto(&self, catalog_item: &CatalogItemDto) -> InventoryItemDto {
        InventoryItemDto {
            catalog_item_id: self.catalog_item_id,
            name: catalog_item.name.clone(),
            description: catalog_item.description.clone(),
            quantity: self.quantity,
            acquired_date: self.acquired_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantItemsDto {
    pub user_id: Uuid,
    pub catalog_item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemDto {
    pub catalog_item_id: Uuid,
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub acquired_date: DateTime<Utc>,
}

/// The catalog's item as seen by the inventory service.
///
/// Unknown fields (price, creation date) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}
