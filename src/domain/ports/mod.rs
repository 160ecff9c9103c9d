//! Domain ports: driving use-case traits and driven repository traits.
//!
//! Adapters implement the driven ports; HTTP handlers depend only on the
//! driving ports so they remain testable without I/O.

mod action_log;
mod action_repository;
mod campaign_repository;
mod campaigns;
mod contact_repository;
mod contacts_command;
mod contacts_query;
mod overview_query;

pub use self::action_log::{ActionLog, FixtureActionLog};
pub use self::action_repository::{
    ActionRepository, ActionRepositoryError, FixtureActionRepository,
};
pub use self::campaign_repository::{
    CampaignRepository, CampaignRepositoryError, FixtureCampaignRepository,
};
pub use self::campaigns::{Campaigns, FixtureCampaigns};
pub use self::contact_repository::{
    ContactRepository, ContactRepositoryError, ContactSearchFilter, FixtureContactRepository,
};
pub use self::contacts_command::{ContactsCommand, FixtureContactsCommand};
pub use self::contacts_query::{ContactListRequest, ContactPage, ContactsQuery, FixtureContactsQuery};
pub use self::overview_query::{FixtureOverviewQuery, OverviewQuery};

#[cfg(test)]
pub use self::action_log::MockActionLog;
#[cfg(test)]
pub use self::action_repository::MockActionRepository;
#[cfg(test)]
pub use self::campaign_repository::MockCampaignRepository;
#[cfg(test)]
pub use self::campaigns::MockCampaigns;
#[cfg(test)]
pub use self::contact_repository::MockContactRepository;
#[cfg(test)]
pub use self::contacts_command::MockContactsCommand;
#[cfg(test)]
pub use self::contacts_query::MockContactsQuery;
#[cfg(test)]
pub use self::overview_query::MockOverviewQuery;
