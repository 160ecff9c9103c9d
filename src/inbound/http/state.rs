//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ActionLog, Campaigns, ContactsCommand, ContactsQuery, FixtureActionLog, FixtureCampaigns,
    FixtureContactsCommand, FixtureContactsQuery, FixtureOverviewQuery, OverviewQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub contacts_command: Arc<dyn ContactsCommand>,
    pub contacts_query: Arc<dyn ContactsQuery>,
    pub action_log: Arc<dyn ActionLog>,
    pub campaigns: Arc<dyn Campaigns>,
    pub overview: Arc<dyn OverviewQuery>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            contacts_command: Arc::new(FixtureContactsCommand),
            contacts_query: Arc::new(FixtureContactsQuery),
            action_log: Arc::new(FixtureActionLog),
            campaigns: Arc::new(FixtureCampaigns),
            overview: Arc::new(FixtureOverviewQuery),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub contacts_command: Arc<dyn ContactsCommand>,
    pub contacts_query: Arc<dyn ContactsQuery>,
    pub action_log: Arc<dyn ActionLog>,
    pub campaigns: Arc<dyn Campaigns>,
    pub overview: Arc<dyn OverviewQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use crm_backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::default());
    /// let _contacts = state.contacts_query.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            contacts_command,
            contacts_query,
            action_log,
            campaigns,
            overview,
        } = ports;
        Self {
            contacts_command,
            contacts_query,
            action_log,
            campaigns,
            overview,
        }
    }
}
