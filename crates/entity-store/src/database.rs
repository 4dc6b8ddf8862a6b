use crate::{InMemoryBidStore, InMemoryItemStore, InMemoryUserStore};

/// Every store of one running process.
///
/// Constructed explicitly at startup and handed to the services; there is no
/// global instance. Clones share the same underlying tables.
#[derive(Debug, Clone, Default)]
pub struct Database {
    pub users: InMemoryUserStore,
    pub items: InMemoryItemStore,
    pub bids: InMemoryBidStore,
}

impl Database {
    /// Creates a database with three empty stores.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use common::{Item, User};

    use super::*;
    use crate::EntityRepository;

    #[tokio::test]
    async fn stores_count_identifiers_independently() {
        let db = Database::new();

        let user = db.users.tx_create(User::new("ana")).await.unwrap();
        let item = db.items.tx_create(Item::new("lamp", 10)).await.unwrap();

        assert_eq!(user.id.as_u64(), 1);
        assert_eq!(item.id.as_u64(), 1);
    }

    #[tokio::test]
    async fn clones_share_tables() {
        let db = Database::new();
        let handle = db.clone();

        db.users.tx_create(User::new("ana")).await.unwrap();
        assert_eq!(handle.users.len().await, 1);
    }
}
