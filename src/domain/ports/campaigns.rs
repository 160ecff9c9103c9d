//! Driving port for campaigns.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::campaign::{Campaign, CampaignDraft};
use crate::domain::error::Error;

/// Driving port for creating and listing campaigns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Campaigns: Send + Sync {
    /// Create a campaign, normalizing its target tags.
    async fn create(&self, draft: CampaignDraft) -> Result<Campaign, Error>;

    /// List campaigns, newest first.
    async fn list(&self) -> Result<Vec<Campaign>, Error>;
}

/// Fixture implementation for handler tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCampaigns;

#[async_trait]
impl Campaigns for FixtureCampaigns {
    async fn create(&self, draft: CampaignDraft) -> Result<Campaign, Error> {
        Ok(Campaign::from_draft(draft, Utc::now()))
    }

    async fn list(&self) -> Result<Vec<Campaign>, Error> {
        Ok(Vec::new())
    }
}
