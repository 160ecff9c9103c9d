//! HTTP inbound adapter exposing REST endpoints.

pub mod actions;
pub mod campaigns;
pub mod contacts;
pub mod error;
pub mod health;
pub mod overview;
pub mod state;

pub use error::ApiResult;
