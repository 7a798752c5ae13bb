//! Catalog service - item CRUD on top of the generic repository

use std::sync::Arc;

use play_domain::{CreateItemDto, Item, ItemDto, PlayError, Result, UpdateItemDto};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::repository::ports::Repository;

/// Catalog service
pub struct CatalogService {
    items: Arc<dyn Repository<Item>>,
}

impl CatalogService {
    pub fn new(items: Arc<dyn Repository<Item>>) -> Self {
        Self { items }
    }

    /// Every catalog item.
    pub async fn list(&self) -> Result<Vec<ItemDto>> {
        let items = self.items.get_all().await?;
        debug!(count = items.len(), "listed catalog items");
        Ok(items.into_iter().map(ItemDto::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<ItemDto>> {
        Ok(self.items.get(&id).await?.map(ItemDto::from))
    }

    /// Create an item with a fresh id, stamped now.
    #[instrument(skip(self, dto), fields(name = %dto.name))]
    pub async fn create(&self, dto: CreateItemDto) -> Result<ItemDto> {
        let item = Item::new(dto.name, dto.description, dto.price);
        self.items.create(item.clone()).await?;
        info!(item_id = %item.id, "catalog item created");
        Ok(item.into())
    }

    /// Overwrite name, description and price of an existing item.
    ///
    /// # Errors
    /// `NotFound` when no item has `id`.
    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: Uuid, dto: UpdateItemDto) -> Result<()> {
        let mut item = self.items.get(&id).await?.ok_or_else(|| not_found(id))?;
        item.apply(dto);
        self.items.update(item).await
    }

    /// Delete an existing item.
    ///
    /// # Errors
    /// `NotFound` when no item has `id`.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if self.items.get(&id).await?.is_none() {
            return Err(not_found(id));
        }
        self.items.remove(&id).await?;
        info!(item_id = %id, "catalog item deleted");
        Ok(())
    }
}

fn not_found(id: Uuid) -> PlayError {
    PlayError::NotFound(format!("catalog item {id}"))
}
