//! Item service.

use common::{Item, ItemId};
use entity_store::{EntityRepository, InMemoryItemStore};

use crate::error::DomainError;

/// Service for listing items up for auction.
#[derive(Debug, Clone)]
pub struct ItemService<S = InMemoryItemStore> {
    store: S,
}

impl<S: EntityRepository<Item>> ItemService<S> {
    /// Creates an item service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stores a new item and returns it with its assigned id.
    #[tracing::instrument(skip(self))]
    pub async fn tx_create(&self, item: Item) -> Result<Item, DomainError> {
        let item = self.store.tx_create(item).await?;

        metrics::counter!("items_created_total").increment(1);
        tracing::info!(item_id = %item.id, "item created");

        Ok(item)
    }

    /// Retrieves an item by id.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: ItemId) -> Result<Item, DomainError> {
        Ok(self.store.get(id).await?)
    }

    /// Lists every item.
    pub async fn list_items(&self) -> Vec<Item> {
        self.store.list().await
    }

    /// Returns the known items among `ids`, each at most once, in
    /// first-requested order.
    pub async fn list_items_by_ids(&self, ids: &[ItemId]) -> Result<Vec<Item>, DomainError> {
        Ok(self.store.list_by_ids(ids).await)
    }
}
