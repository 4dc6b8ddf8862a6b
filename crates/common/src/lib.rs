//! Shared types for the auction store.

mod types;

pub use types::{Amount, Bid, BidId, Entity, Item, ItemId, User, UserId};
