use thiserror::Error;

use crate::ItemId;

/// Errors that can occur when interacting with an entity store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No entity of this kind is stored under the identifier.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u64 },

    /// The item has no bids recorded yet.
    #[error("No bids recorded for item {0}")]
    NoBids(ItemId),

    /// Another bid creation for the same item is currently committing.
    #[error("Item {0} has a bid being committed")]
    Conflict(ItemId),

    /// A lease taken for one item was used to commit a bid on another.
    #[error("Lease held for item {held} cannot commit a bid on item {requested}")]
    LeaseMismatch { held: ItemId, requested: ItemId },

    /// The backing storage failed in a way callers cannot correct.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
