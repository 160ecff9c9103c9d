//! Port for campaign persistence.

use async_trait::async_trait;

use crate::domain::campaign::Campaign;

/// Errors raised by campaign repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CampaignRepositoryError {
    /// Repository connection could not be established.
    #[error("campaign repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("campaign repository query failed: {message}")]
    Query { message: String },
}

impl CampaignRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for writing and listing campaigns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    /// Insert a campaign.
    async fn insert(&self, campaign: &Campaign) -> Result<Campaign, CampaignRepositoryError>;

    /// List campaigns, newest first.
    async fn list(&self) -> Result<Vec<Campaign>, CampaignRepositoryError>;

    /// Count campaigns without a completion timestamp.
    async fn count_active(&self) -> Result<i64, CampaignRepositoryError>;
}

/// Fixture implementation for tests that do not exercise campaign persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCampaignRepository;

#[async_trait]
impl CampaignRepository for FixtureCampaignRepository {
    async fn insert(&self, campaign: &Campaign) -> Result<Campaign, CampaignRepositoryError> {
        Ok(campaign.clone())
    }

    async fn list(&self) -> Result<Vec<Campaign>, CampaignRepositoryError> {
        Ok(Vec::new())
    }

    async fn count_active(&self) -> Result<i64, CampaignRepositoryError> {
        Ok(0)
    }
}
