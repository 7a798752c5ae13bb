//! Catalog entities and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::Entity;

/// Item offered in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_date: DateTime<Utc>,
}

impl Entity for Item {
    type Key = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }
}

impl Item {
    /// New item with a fresh id, created now.
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            price,
            created_date: Utc::now(),
        }
    }

    /// Overwrite the mutable fields; id and creation date stay.
    pub fn apply(&mut self, update: UpdateItemDto) {
        self.name = update.name;
        self.description = update.description;
        self.price = update.price;
    }

    pub fn to_dto(&self) -> ItemDto {
        ItemDto::from(self.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_date: DateTime<Utc>,
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            price: item.price,
            created_date: item.created_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemDto {
    pub name: String,
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemDto {
    pub name: String,
    pub description: String,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_serializes_camel_case() {
        let item = Item::new("Potion", "Restores a small amount of HP", 5.0);
        let json = serde_json::to_value(&item).unwrap();

        assert!(json.get("createdDate").is_some());
        assert_eq!(json["name"], "Potion");
    }

    #[test]
    fn apply_keeps_identity() {
        let mut item = Item::new("Potion", "Restores HP", 5.0);
        let (id, created) = (item.id, item.created_date);

        item.apply(UpdateItemDto {
            name: "Hi-Potion".into(),
            description: "Restores more HP".into(),
            price: 9.0,
        });

        assert_eq!(item.id, id);
        assert_eq!(item.created_date, created);
        assert_eq!(item.name, "Hi-Potion");
        assert_eq!(item.price, 9.0);
    }
}
