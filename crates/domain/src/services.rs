use entity_store::Database;

use crate::{BidService, ItemService, UserService};

/// The service graph of one process, wired over a shared [`Database`].
#[derive(Debug, Clone)]
pub struct Services {
    pub users: UserService,
    pub items: ItemService,
    pub bids: BidService,
}

impl Services {
    pub fn new(db: &Database) -> Self {
        let users = UserService::new(db.users.clone());
        let items = ItemService::new(db.items.clone());
        let bids = BidService::new(db.bids.clone(), items.clone(), users.clone());

        Self { users, items, bids }
    }
}
