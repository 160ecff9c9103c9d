//! Dashboard overview aggregation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::overview::CrmOverview;
use crate::domain::ports::{
    ActionRepository, ActionRepositoryError, CampaignRepository, CampaignRepositoryError,
    ContactRepository, ContactRepositoryError, OverviewQuery,
};

/// Number of recent actions included in the snapshot.
const RECENT_ACTION_LIMIT: i64 = 10;

/// Number of daily activity buckets included in the snapshot.
const DAILY_COUNT_DAYS: i64 = 14;

/// Computes the point-in-time dashboard snapshot across all three stores.
#[derive(Clone)]
pub struct OverviewService<R, A, C> {
    contacts: Arc<R>,
    actions: Arc<A>,
    campaigns: Arc<C>,
}

impl<R, A, C> OverviewService<R, A, C> {
    /// Create a new service over the given repositories.
    pub fn new(contacts: Arc<R>, actions: Arc<A>, campaigns: Arc<C>) -> Self {
        Self {
            contacts,
            actions,
            campaigns,
        }
    }
}

fn map_contact_error(error: ContactRepositoryError) -> Error {
    match error {
        ContactRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("contact repository unavailable: {message}"))
        }
        other => Error::internal(format!("contact repository error: {other}")),
    }
}

fn map_action_error(error: ActionRepositoryError) -> Error {
    match error {
        ActionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("action repository unavailable: {message}"))
        }
        other => Error::internal(format!("action repository error: {other}")),
    }
}

fn map_campaign_error(error: CampaignRepositoryError) -> Error {
    match error {
        CampaignRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("campaign repository unavailable: {message}"))
        }
        other => Error::internal(format!("campaign repository error: {other}")),
    }
}

#[async_trait]
impl<R, A, C> OverviewQuery for OverviewService<R, A, C>
where
    R: ContactRepository + 'static,
    A: ActionRepository + 'static,
    C: CampaignRepository + 'static,
{
    async fn overview(&self) -> Result<CrmOverview, Error> {
        let total_contacts = self
            .contacts
            .count_active()
            .await
            .map_err(map_contact_error)?;
        let stage_counts: BTreeMap<_, _> = self
            .contacts
            .stage_counts()
            .await
            .map_err(map_contact_error)?
            .into_iter()
            .collect();

        // Tag frequencies count every occurrence across the whole book,
        // archived contacts included.
        let mut tag_counts = BTreeMap::new();
        for tags in self.contacts.tag_rows().await.map_err(map_contact_error)? {
            for tag in tags {
                *tag_counts.entry(tag).or_insert(0_i64) += 1;
            }
        }

        let recent_actions = self
            .actions
            .list(None, RECENT_ACTION_LIMIT)
            .await
            .map_err(map_action_error)?;
        let daily_action_counts = self
            .actions
            .daily_counts(DAILY_COUNT_DAYS)
            .await
            .map_err(map_action_error)?;

        let active_campaigns = self
            .campaigns
            .count_active()
            .await
            .map_err(map_campaign_error)?;

        Ok(CrmOverview {
            total_contacts,
            active_campaigns,
            stage_counts,
            tag_counts,
            recent_actions,
            daily_action_counts,
        })
    }
}
