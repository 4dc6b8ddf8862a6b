//! Auction services over the in-memory entity stores.
//!
//! This crate provides:
//! - the error taxonomy shown to callers ([`ModelError`], [`ValidationError`])
//! - an ordered, field-scoped [`ValidationPipeline`]
//! - user, item and bid services, wired together by [`Services`]

pub mod bid;
pub mod error;
pub mod item;
pub mod services;
pub mod user;
pub mod validation;

pub use bid::BidService;
pub use error::{DomainError, ModelError, ValidationError};
pub use item::ItemService;
pub use services::Services;
pub use user::UserService;
pub use validation::{CheckResult, ValidationPipeline};
