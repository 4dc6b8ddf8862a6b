use async_trait::async_trait;
use common::{Bid, BidId, Entity, ItemId, UserId};

use crate::{KeyGuard, Result, StoreError};

/// Exclusive right to commit bids on one item.
pub type ItemLease = KeyGuard<ItemId>;

/// Storage capability for entities whose writes serialize on the whole
/// collection (users, items).
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait EntityRepository<T: Entity>: Send + Sync {
    /// Stores the candidate under the next identifier while holding the
    /// collection lock, and returns the stored value.
    async fn tx_create(&self, candidate: T) -> Result<T>;

    /// Retrieves an entity by identifier.
    async fn get(&self, id: T::Id) -> Result<T>;

    /// Returns every stored entity. Callers must not rely on the order.
    async fn list(&self) -> Vec<T>;

    /// Returns the stored entities whose identifier is requested.
    ///
    /// Unknown identifiers are skipped. Each entity appears at most once, in
    /// the order its identifier was first requested.
    async fn list_by_ids(&self, ids: &[T::Id]) -> Vec<T>;
}

/// Storage capability for bids, whose writes serialize per item.
#[async_trait]
pub trait BidRepository: Send + Sync {
    /// Returns true while a bid creation holds the item's lease. Never waits.
    fn is_item_locked(&self, item_id: ItemId) -> bool;

    /// Waits for and takes the item's lease.
    async fn lock_item(&self, item_id: ItemId) -> ItemLease;

    /// Stores a bid on the leased item under the next identifier.
    ///
    /// Fails with [`StoreError::LeaseMismatch`] if the lease is for a
    /// different item.
    async fn create(&self, lease: &ItemLease, bid: Bid) -> Result<Bid>;

    /// Commits a bid unless its item is already busy.
    ///
    /// A busy item yields [`StoreError::Conflict`] immediately, without
    /// waiting and without touching stored state. Callers that must validate
    /// against current bids take the lease themselves with
    /// [`lock_item`](Self::lock_item) and commit with [`create`](Self::create).
    async fn tx_create(&self, bid: Bid) -> Result<Bid> {
        if self.is_item_locked(bid.item_id) {
            return Err(StoreError::Conflict(bid.item_id));
        }

        let lease = self.lock_item(bid.item_id).await;
        self.create(&lease, bid).await
    }

    /// Retrieves a bid by identifier.
    async fn get(&self, id: BidId) -> Result<Bid>;

    /// Returns every bid placed on the item; empty when there are none.
    async fn list_by_item(&self, item_id: ItemId) -> Result<Vec<Bid>>;

    /// Returns the highest bid on the item, the earliest one among equals.
    ///
    /// Fails with [`StoreError::NoBids`] when the item has no bids.
    async fn winning_bid(&self, item_id: ItemId) -> Result<Bid>;

    /// Returns every bid placed by the user; empty when there are none.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Bid>>;
}
