use serde::{Deserialize, Serialize};

/// Declares a store-assigned identifier newtype.
///
/// Identifiers start at 1 inside their owning store; the zero value marks a
/// candidate that has not been committed yet.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Identifier carried by candidates that have not been stored yet.
            pub const UNASSIGNED: Self = Self(0);

            /// Creates an identifier from its raw value.
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the raw value.
            pub const fn as_u64(&self) -> u64 {
                self.0
            }

            /// Returns true once a store has assigned this identifier.
            pub const fn is_assigned(&self) -> bool {
                self.0 != 0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`User`].
    UserId
);
entity_id!(
    /// Identifier of an [`Item`].
    ItemId
);
entity_id!(
    /// Identifier of a [`Bid`].
    BidId
);

/// Monetary amount in the smallest unit.
pub type Amount = u64;

/// A value owned by an entity store.
///
/// The store assigns the identifier at creation time; everything else about
/// the entity is fixed by the caller.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Copy + Ord + std::hash::Hash + Send + Sync + From<u64> + Into<u64> + std::fmt::Display + 'static;

    /// Short lowercase name used in errors and traces.
    const KIND: &'static str;

    fn id(&self) -> Self::Id;

    /// Returns a copy carrying the given identifier.
    fn with_id(self, id: Self::Id) -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    /// Creates an uncommitted user.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UserId::UNASSIGNED,
            name: name.into(),
        }
    }
}

impl Entity for User {
    type Id = UserId;
    const KIND: &'static str = "user";

    fn id(&self) -> UserId {
        self.id
    }

    fn with_id(self, id: UserId) -> Self {
        Self { id, ..self }
    }
}

/// An item up for auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Reserve price; every accepted bid must strictly exceed it.
    #[serde(rename = "initialValue")]
    pub starting_value: Amount,
}

impl Item {
    /// Creates an uncommitted item.
    pub fn new(name: impl Into<String>, starting_value: Amount) -> Self {
        Self {
            id: ItemId::UNASSIGNED,
            name: name.into(),
            starting_value,
        }
    }
}

impl Entity for Item {
    type Id = ItemId;
    const KIND: &'static str = "item";

    fn id(&self) -> ItemId {
        self.id
    }

    fn with_id(self, id: ItemId) -> Self {
        Self { id, ..self }
    }
}

/// A user's offer on an item. Relations are by identifier only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: BidId,
    pub user_id: UserId,
    pub item_id: ItemId,
    pub amount: Amount,
}

impl Bid {
    /// Creates an uncommitted bid.
    pub fn new(item_id: ItemId, user_id: UserId, amount: Amount) -> Self {
        Self {
            id: BidId::UNASSIGNED,
            user_id,
            item_id,
            amount,
        }
    }
}

impl Entity for Bid {
    type Id = BidId;
    const KIND: &'static str = "bid";

    fn id(&self) -> BidId {
        self.id
    }

    fn with_id(self, id: BidId) -> Self {
        Self { id, ..self }
    }
}
