//! HTTP route handlers.

pub mod bids;
pub mod health;
pub mod items;
pub mod metrics;
pub mod users;

use domain::Services;

/// Shared application state accessible from all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub services: Services,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}
