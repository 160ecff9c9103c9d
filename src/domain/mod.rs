//! Domain layer: entities, driving/driven ports, and the services that
//! implement the driving ports.
//!
//! Nothing in this layer touches HTTP or the database; adapters live in
//! `inbound` and `outbound`.

pub mod action;
mod action_service;
pub mod campaign;
mod campaign_service;
pub mod contact;
mod contact_service;
mod error;
pub mod overview;
mod overview_service;
pub mod ports;

pub use self::action::{Action, ActionDraft, ActionStatus, ActionType};
pub use self::action_service::ActionService;
pub use self::campaign::{Campaign, CampaignDraft};
pub use self::campaign_service::CampaignService;
pub use self::contact::{
    Contact, ContactDraft, ContactPatch, RelationshipStage, normalize_tags,
};
pub use self::contact_service::ContactService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::overview::{CrmOverview, DailyActionCount};
pub use self::overview_service::OverviewService;
