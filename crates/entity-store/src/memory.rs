use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use common::{Bid, BidId, Entity, Item, ItemId, User, UserId};
use tokio::sync::RwLock;

use crate::{
    KeyedLock, Result, SimpleLock, StoreError,
    store::{BidRepository, EntityRepository, ItemLease},
};

struct Table<T: Entity> {
    rows: BTreeMap<T::Id, T>,
    last_id: u64,
}

/// The in-memory table for one entity kind.
///
/// Owns the rows and the identifier counter. The table only guarantees
/// memory safety; serializing writers is the job of the lock wrapped around
/// it ([`InMemoryStore`] or [`InMemoryBidStore`]).
pub struct EntityStore<T: Entity> {
    table: RwLock<Table<T>>,
}

impl<T: Entity> fmt::Debug for EntityStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("entity", &T::KIND)
            .finish_non_exhaustive()
    }
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }
}

impl<T: Entity> EntityStore<T> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a copy of the candidate under the next identifier.
    ///
    /// Identifiers start at 1 and are never reused. Callers must hold the
    /// lock that serializes writers of this table.
    pub async fn create(&self, candidate: T) -> T {
        let mut table = self.table.write().await;
        table.last_id += 1;

        let stored = candidate.with_id(T::Id::from(table.last_id));
        table.rows.insert(stored.id(), stored.clone());
        stored
    }

    pub async fn get(&self, id: T::Id) -> Result<T> {
        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: T::KIND,
                id: id.into(),
            })
    }

    /// Returns all entities in ascending identifier order.
    pub async fn list(&self) -> Vec<T> {
        self.table.read().await.rows.values().cloned().collect()
    }

    /// Returns the stored entities among `ids` in first-requested order.
    pub async fn list_by_ids(&self, ids: &[T::Id]) -> Vec<T> {
        let mut seen = HashSet::with_capacity(ids.len());
        let table = self.table.read().await;
        ids.iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| table.rows.get(id).cloned())
            .collect()
    }

    /// Returns the entities matching `predicate` in ascending identifier order.
    pub async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.table
            .read()
            .await
            .rows
            .values()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }

    /// Returns the number of stored entities.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// In-memory store whose writers serialize on a collection-wide lock.
#[derive(Debug, Clone)]
pub struct InMemoryStore<T: Entity> {
    lock: Arc<SimpleLock>,
    entities: Arc<EntityStore<T>>,
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self {
            lock: Arc::new(SimpleLock::new()),
            entities: Arc::new(EntityStore::new()),
        }
    }
}

impl<T: Entity> InMemoryStore<T> {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entities.
    pub async fn len(&self) -> usize {
        self.entities.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.is_empty().await
    }
}

#[async_trait]
impl<T: Entity> EntityRepository<T> for InMemoryStore<T> {
    async fn tx_create(&self, candidate: T) -> Result<T> {
        let _guard = self.lock.lock().await;
        let stored = self.entities.create(candidate).await;
        tracing::trace!(entity = T::KIND, id = %stored.id(), "entity stored");
        Ok(stored)
    }

    async fn get(&self, id: T::Id) -> Result<T> {
        self.entities.get(id).await
    }

    async fn list(&self) -> Vec<T> {
        self.entities.list().await
    }

    async fn list_by_ids(&self, ids: &[T::Id]) -> Vec<T> {
        self.entities.list_by_ids(ids).await
    }
}

/// User table guarded by a collection lock.
pub type InMemoryUserStore = InMemoryStore<User>;

/// Item table guarded by a collection lock.
pub type InMemoryItemStore = InMemoryStore<Item>;

/// In-memory bid store whose writers serialize per item.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBidStore {
    locks: Arc<KeyedLock<ItemId>>,
    entities: Arc<EntityStore<Bid>>,
}

impl InMemoryBidStore {
    /// Creates a new empty bid store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of bids stored.
    pub async fn bid_count(&self) -> usize {
        self.entities.len().await
    }
}

#[async_trait]
impl BidRepository for InMemoryBidStore {
    fn is_item_locked(&self, item_id: ItemId) -> bool {
        self.locks.is_locked(item_id)
    }

    async fn lock_item(&self, item_id: ItemId) -> ItemLease {
        self.locks.lock(item_id).await
    }

    async fn create(&self, lease: &ItemLease, bid: Bid) -> Result<Bid> {
        if lease.key() != bid.item_id {
            return Err(StoreError::LeaseMismatch {
                held: lease.key(),
                requested: bid.item_id,
            });
        }

        let stored = self.entities.create(bid).await;
        tracing::trace!(id = %stored.id, item_id = %stored.item_id, "bid stored");
        Ok(stored)
    }

    async fn get(&self, id: BidId) -> Result<Bid> {
        self.entities.get(id).await
    }

    async fn list_by_item(&self, item_id: ItemId) -> Result<Vec<Bid>> {
        Ok(self.entities.filter(|b| b.item_id == item_id).await)
    }

    async fn winning_bid(&self, item_id: ItemId) -> Result<Bid> {
        // Bids arrive in ascending id order, so a strict comparison keeps the
        // earliest among equal amounts.
        self.list_by_item(item_id)
            .await?
            .into_iter()
            .reduce(|best, bid| if bid.amount > best.amount { bid } else { best })
            .ok_or(StoreError::NoBids(item_id))
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Bid>> {
        Ok(self.entities.filter(|b| b.user_id == user_id).await)
    }
}
