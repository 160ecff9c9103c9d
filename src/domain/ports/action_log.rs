//! Driving port for the action log.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::action::{Action, ActionDraft, ActionType};
use crate::domain::error::Error;

/// Driving port for appending and listing interaction records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionLog: Send + Sync {
    /// Append an action, defaulting status to completed and the timestamp
    /// to now, and touch the owning contact's last-interaction stamps.
    async fn log(&self, draft: ActionDraft) -> Result<Action, Error>;

    /// List actions, newest first, optionally scoped to one contact.
    async fn list(&self, contact_id: Option<Uuid>, limit: i64) -> Result<Vec<Action>, Error>;
}

/// Fixture implementation for handler tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureActionLog;

#[async_trait]
impl ActionLog for FixtureActionLog {
    async fn log(&self, draft: ActionDraft) -> Result<Action, Error> {
        let action_type = draft.action_type.unwrap_or(ActionType::MessageSent);
        Ok(Action::from_draft(draft, action_type, Utc::now()))
    }

    async fn list(&self, _contact_id: Option<Uuid>, _limit: i64) -> Result<Vec<Action>, Error> {
        Ok(Vec::new())
    }
}
