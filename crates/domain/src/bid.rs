//! Bid service.
//!
//! Placing a bid takes the item's lease before validating, so the checks
//! against the current winning bid and the commit happen under the same
//! exclusion. A bid arriving while the item is leased fails fast with
//! [`ModelError::Conflict`] instead of queueing.

use common::{Bid, Item, ItemId, User, UserId};
use entity_store::{
    BidRepository, EntityRepository, InMemoryBidStore, InMemoryItemStore, InMemoryUserStore,
    StoreError,
};

use crate::error::{DomainError, ModelError};
use crate::item::ItemService;
use crate::user::UserService;
use crate::validation::{CheckResult, ValidationPipeline};

/// Service for placing and querying bids.
#[derive(Debug, Clone)]
pub struct BidService<B = InMemoryBidStore, I = InMemoryItemStore, U = InMemoryUserStore> {
    bids: B,
    items: ItemService<I>,
    users: UserService<U>,
}

impl<B, I, U> BidService<B, I, U>
where
    B: BidRepository,
    I: EntityRepository<Item>,
    U: EntityRepository<User>,
{
    /// Creates a bid service that resolves items and users through the given
    /// services.
    pub fn new(bids: B, items: ItemService<I>, users: UserService<U>) -> Self {
        Self { bids, items, users }
    }

    /// Returns a reference to the underlying bid store.
    pub fn store(&self) -> &B {
        &self.bids
    }

    /// Validates and commits a bid.
    ///
    /// Failures are reported per field:
    /// - `item`: the item does not exist, or the amount does not exceed its
    ///   starting value;
    /// - `user`: the user does not exist;
    /// - `bid`: the amount does not exceed the current winning bid.
    ///
    /// Deliberately not [`BidRepository::tx_create`]: the item lease is taken
    /// before the checks and held through commit, so the winning bid cannot
    /// change between validation and insert.
    #[tracing::instrument(
        skip(self, bid),
        fields(item_id = %bid.item_id, user_id = %bid.user_id, amount = bid.amount)
    )]
    pub async fn tx_create(&self, bid: Bid) -> Result<Bid, DomainError> {
        let item_id = bid.item_id;

        if self.bids.is_item_locked(item_id) {
            metrics::counter!("bid_conflicts_total").increment(1);
            tracing::debug!("item busy, bid turned away");
            return Err(ModelError::Conflict.into());
        }
        let lease = self.bids.lock_item(item_id).await;

        let verdict = ValidationPipeline::new()
            .field("item", self.item_exists(item_id))
            .field("user", self.user_exists(bid.user_id))
            .field("item", self.beats_starting_value(&bid))
            .field("bid", self.beats_winning_bid(&bid))
            .run()
            .await;
        if let Err(e) = verdict {
            metrics::counter!("bids_rejected_total").increment(1);
            return Err(e);
        }

        let bid = self.bids.create(&lease, bid).await?;

        metrics::counter!("bids_placed_total").increment(1);
        tracing::info!(bid_id = %bid.id, "bid placed");

        Ok(bid)
    }

    /// Lists every bid on an existing item; empty when it has none.
    #[tracing::instrument(skip(self))]
    pub async fn list_bids_by_item_id(&self, item_id: ItemId) -> Result<Vec<Bid>, DomainError> {
        ValidationPipeline::new()
            .field("item", self.item_exists(item_id))
            .run()
            .await?;

        Ok(self.bids.list_by_item(item_id).await?)
    }

    /// Returns the highest bid on an existing item.
    ///
    /// An item without bids yields [`ModelError::NotFound`].
    #[tracing::instrument(skip(self))]
    pub async fn get_winning_bid(&self, item_id: ItemId) -> Result<Bid, DomainError> {
        ValidationPipeline::new()
            .field("item", self.item_exists(item_id))
            .run()
            .await?;

        Ok(self.bids.winning_bid(item_id).await?)
    }

    /// Lists every bid placed by an existing user; empty when there are none.
    #[tracing::instrument(skip(self))]
    pub async fn list_bids_by_user_id(&self, user_id: UserId) -> Result<Vec<Bid>, DomainError> {
        ValidationPipeline::new()
            .field("user", self.user_exists(user_id))
            .run()
            .await?;

        Ok(self.bids.list_by_user(user_id).await?)
    }

    async fn item_exists(&self, item_id: ItemId) -> CheckResult {
        self.items.get(item_id).await.map(|_| ())
    }

    async fn user_exists(&self, user_id: UserId) -> CheckResult {
        self.users.get(user_id).await.map(|_| ())
    }

    async fn beats_starting_value(&self, bid: &Bid) -> CheckResult {
        let item = self.items.get(bid.item_id).await?;
        if bid.amount <= item.starting_value {
            return Err(ModelError::LowValue.into());
        }
        Ok(())
    }

    async fn beats_winning_bid(&self, bid: &Bid) -> CheckResult {
        let floor = match self.bids.winning_bid(bid.item_id).await {
            Ok(winning) => winning.amount,
            Err(StoreError::NoBids(_)) => 0,
            Err(e) => return Err(e.into()),
        };
        if bid.amount <= floor {
            return Err(ModelError::LowValue.into());
        }
        Ok(())
    }
}
