//! PostgreSQL persistence adapters backed by Diesel.

mod diesel_action_repository;
mod diesel_campaign_repository;
mod diesel_contact_repository;
mod error_mapping;
mod models;
mod pool;
pub(crate) mod schema;

pub use self::diesel_action_repository::DieselActionRepository;
pub use self::diesel_campaign_repository::DieselCampaignRepository;
pub use self::diesel_contact_repository::DieselContactRepository;
pub use self::pool::{DbPool, PoolConfig, PoolError};
