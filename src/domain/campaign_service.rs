//! Campaign service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::campaign::{Campaign, CampaignDraft};
use crate::domain::error::Error;
use crate::domain::ports::{CampaignRepository, CampaignRepositoryError, Campaigns};

/// Creates and lists outreach campaigns.
#[derive(Clone)]
pub struct CampaignService<C> {
    repo: Arc<C>,
}

impl<C> CampaignService<C> {
    /// Create a new service with the given repository.
    pub fn new(repo: Arc<C>) -> Self {
        Self { repo }
    }
}

fn map_repo_error(error: CampaignRepositoryError) -> Error {
    match error {
        CampaignRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("campaign repository unavailable: {message}"))
        }
        CampaignRepositoryError::Query { message } => {
            Error::internal(format!("campaign repository error: {message}"))
        }
    }
}

#[async_trait]
impl<C> Campaigns for CampaignService<C>
where
    C: CampaignRepository + 'static,
{
    async fn create(&self, draft: CampaignDraft) -> Result<Campaign, Error> {
        if draft.user_prompt.trim().is_empty() {
            return Err(Error::invalid_request("user_prompt is required"));
        }
        let campaign = Campaign::from_draft(draft, Utc::now());
        self.repo.insert(&campaign).await.map_err(map_repo_error)
    }

    async fn list(&self) -> Result<Vec<Campaign>, Error> {
        self.repo.list().await.map_err(map_repo_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::MockCampaignRepository;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn create_normalizes_target_tags() {
        let mut repo = MockCampaignRepository::new();
        repo.expect_insert()
            .withf(|campaign| campaign.target_tags == vec!["fintech".to_owned()])
            .times(1)
            .returning(|campaign| Ok(campaign.clone()));

        let service = CampaignService::new(Arc::new(repo));
        let created = service
            .create(CampaignDraft {
                user_prompt: "warm up fintech leads".to_owned(),
                target_tags: vec![" FinTech ".to_owned(), "fintech".to_owned()],
            })
            .await
            .expect("create succeeds");

        assert!(created.is_active());
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_a_blank_prompt() {
        let repo = MockCampaignRepository::new();
        let service = CampaignService::new(Arc::new(repo));
        let err = service
            .create(CampaignDraft {
                user_prompt: "  ".to_owned(),
                target_tags: Vec::new(),
            })
            .await
            .expect_err("blank prompt");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn list_maps_connection_errors() {
        let mut repo = MockCampaignRepository::new();
        repo.expect_list()
            .times(1)
            .returning(|| Err(CampaignRepositoryError::connection("refused")));

        let service = CampaignService::new(Arc::new(repo));
        let err = service.list().await.expect_err("unavailable");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
