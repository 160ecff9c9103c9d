//! Action log service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::action::{Action, ActionDraft};
use crate::domain::error::Error;
use crate::domain::ports::{ActionLog, ActionRepository, ActionRepositoryError};

/// Appends interaction records and serves the history views.
#[derive(Clone)]
pub struct ActionService<A> {
    repo: Arc<A>,
}

impl<A> ActionService<A> {
    /// Create a new service with the given repository.
    pub fn new(repo: Arc<A>) -> Self {
        Self { repo }
    }
}

fn map_repo_error(error: ActionRepositoryError) -> Error {
    match error {
        ActionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("action repository unavailable: {message}"))
        }
        ActionRepositoryError::Query { message } => {
            Error::internal(format!("action repository error: {message}"))
        }
        ActionRepositoryError::MissingContact { message } => {
            Error::not_found(format!("contact for action not found: {message}"))
        }
    }
}

#[async_trait]
impl<A> ActionLog for ActionService<A>
where
    A: ActionRepository + 'static,
{
    async fn log(&self, draft: ActionDraft) -> Result<Action, Error> {
        let action_type = draft
            .action_type
            .ok_or_else(|| Error::invalid_request("action_type is required"))?;
        let action = Action::from_draft(draft, action_type, Utc::now());
        self.repo.log(&action).await.map_err(map_repo_error)
    }

    async fn list(&self, contact_id: Option<Uuid>, limit: i64) -> Result<Vec<Action>, Error> {
        self.repo
            .list(contact_id, limit)
            .await
            .map_err(map_repo_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::action::{ActionStatus, ActionType};
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::MockActionRepository;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn log_defaults_status_and_timestamp() {
        let before = Utc::now();
        let mut repo = MockActionRepository::new();
        repo.expect_log()
            .withf(move |action| {
                action.status == ActionStatus::Completed && action.timestamp >= before
            })
            .times(1)
            .returning(|action| Ok(action.clone()));

        let service = ActionService::new(Arc::new(repo));
        let logged = service
            .log(ActionDraft {
                contact_id: Uuid::new_v4(),
                action_type: Some(ActionType::MessageSent),
                ..ActionDraft::default()
            })
            .await
            .expect("log succeeds");

        assert_eq!(logged.action_type, ActionType::MessageSent);
    }

    #[rstest]
    #[tokio::test]
    async fn log_preserves_an_explicit_backdated_timestamp() {
        let backdated = Utc::now() - chrono::Duration::days(3);
        let mut repo = MockActionRepository::new();
        repo.expect_log()
            .withf(move |action| action.timestamp == backdated)
            .times(1)
            .returning(|action| Ok(action.clone()));

        let service = ActionService::new(Arc::new(repo));
        service
            .log(ActionDraft {
                contact_id: Uuid::new_v4(),
                action_type: Some(ActionType::PostLiked),
                timestamp: Some(backdated),
                ..ActionDraft::default()
            })
            .await
            .expect("log succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn log_without_action_type_is_invalid() {
        let repo = MockActionRepository::new();
        let service = ActionService::new(Arc::new(repo));
        let err = service
            .log(ActionDraft {
                contact_id: Uuid::new_v4(),
                ..ActionDraft::default()
            })
            .await
            .expect_err("missing action_type");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn log_maps_missing_contact_to_not_found() {
        let mut repo = MockActionRepository::new();
        repo.expect_log()
            .times(1)
            .returning(|_| Err(ActionRepositoryError::missing_contact("fk violation")));

        let service = ActionService::new(Arc::new(repo));
        let err = service
            .log(ActionDraft {
                contact_id: Uuid::new_v4(),
                action_type: Some(ActionType::ProfileViewed),
                ..ActionDraft::default()
            })
            .await
            .expect_err("unknown contact");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_scopes_to_the_requested_contact() {
        let contact_id = Uuid::new_v4();
        let mut repo = MockActionRepository::new();
        repo.expect_list()
            .withf(move |scope, limit| *scope == Some(contact_id) && *limit == 25)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let service = ActionService::new(Arc::new(repo));
        let listed = service
            .list(Some(contact_id), 25)
            .await
            .expect("list succeeds");
        assert!(listed.is_empty());
    }
}
