//! In-memory entity stores for the auction system.
//!
//! Users and items serialize their writers on a collection-wide
//! [`SimpleLock`]; bids serialize per item on a [`KeyedLock`], so bids on
//! different items commit in parallel while a second concurrent bid on a busy
//! item is turned away with [`StoreError::Conflict`].

pub mod database;
pub mod error;
pub mod lock;
pub mod memory;
pub mod store;

pub use common::{Bid, BidId, Entity, Item, ItemId, User, UserId};
pub use database::Database;
pub use error::{Result, StoreError};
pub use lock::{KeyGuard, KeyedLock, SimpleLock};
pub use memory::{EntityStore, InMemoryBidStore, InMemoryItemStore, InMemoryStore, InMemoryUserStore};
pub use store::{BidRepository, EntityRepository, ItemLease};
