//! Port for appending and reading interaction records.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::action::Action;
use crate::domain::overview::DailyActionCount;

/// Errors raised by action repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionRepositoryError {
    /// Repository connection could not be established.
    #[error("action repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("action repository query failed: {message}")]
    Query { message: String },

    /// The owning contact does not exist; the storage-level foreign key
    /// rejected the insert.
    #[error("action references unknown contact: {message}")]
    MissingContact { message: String },
}

impl ActionRepositoryError {
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

    /// Create a missing-contact error with the given message.
    pub fn missing_contact(message: impl Into<String>) -> Self {
        Self::MissingContact {
            message: message.into(),
        }
    }
}

/// Port for the append-only action log.
///
/// `log` updates the owning contact's `last_interaction_at` and the
/// relationship's `last_interaction` to the action timestamp in the same
/// transaction as the insert, so the three are never observed out of sync.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionRepository: Send + Sync {
    /// Append an action and touch the owning contact's interaction stamps.
    async fn log(&self, action: &Action) -> Result<Action, ActionRepositoryError>;

    /// List actions, newest first, optionally scoped to one contact.
    async fn list(
        &self,
        contact_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Action>, ActionRepositoryError>;

    /// Count actions per calendar day for the most recent `days` distinct
    /// days with activity, newest day first.
    async fn daily_counts(&self, days: i64)
    -> Result<Vec<DailyActionCount>, ActionRepositoryError>;
}

/// Fixture implementation for tests that do not exercise action persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureActionRepository;

#[async_trait]
impl ActionRepository for FixtureActionRepository {
    async fn log(&self, action: &Action) -> Result<Action, ActionRepositoryError> {
        Ok(action.clone())
    }

    async fn list(
        &self,
        _contact_id: Option<Uuid>,
        _limit: i64,
    ) -> Result<Vec<Action>, ActionRepositoryError> {
        Ok(Vec::new())
    }

    async fn daily_counts(
        &self,
        _days: i64,
    ) -> Result<Vec<DailyActionCount>, ActionRepositoryError> {
        Ok(Vec::new())
    }
}
