//! Immutable interaction records appended by the action log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of outreach interaction performed with a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    PostLiked,
    CommentPosted,
    SkillEndorsed,
    ConnectionRequestSent,
    MessageSent,
    ProfileViewed,
}

/// Error raised when parsing an unknown action type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action type: {0}")]
pub struct ParseActionTypeError(pub String);

impl ActionType {
    /// Canonical snake_case representation used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostLiked => "post_liked",
            Self::CommentPosted => "comment_posted",
            Self::SkillEndorsed => "skill_endorsed",
            Self::ConnectionRequestSent => "connection_request_sent",
            Self::MessageSent => "message_sent",
            Self::ProfileViewed => "profile_viewed",
        }
    }
}

impl FromStr for ActionType {
    type Err = ParseActionTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "post_liked" => Ok(Self::PostLiked),
            "comment_posted" => Ok(Self::CommentPosted),
            "skill_endorsed" => Ok(Self::SkillEndorsed),
            "connection_request_sent" => Ok(Self::ConnectionRequestSent),
            "message_sent" => Ok(Self::MessageSent),
            "profile_viewed" => Ok(Self::ProfileViewed),
            other => Err(ParseActionTypeError(other.to_owned())),
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution status recorded alongside an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    Completed,
    Failed,
}

/// Error raised when parsing an unknown action status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action status: {0}")]
pub struct ParseActionStatusError(pub String);

impl ActionStatus {
    /// Canonical snake_case representation used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for ActionStatus {
    type Err = ParseActionStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(ParseActionStatusError(other.to_owned())),
        }
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An interaction performed with a contact.
///
/// Actions are append-only bookkeeping: once logged they are never mutated
/// by this service.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub action_type: ActionType,
    pub details: Map<String, Value>,
    pub status: ActionStatus,
    pub timestamp: DateTime<Utc>,
    pub metadata: Map<String, Value>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Payload for appending a new action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionDraft {
    pub contact_id: Uuid,
    pub action_type: Option<ActionType>,
    pub details: Option<Map<String, Value>>,
    pub status: Option<ActionStatus>,
    /// Defaults to "now" when unspecified; no max() reconciliation is done
    /// against the owning contact, last write wins.
    pub timestamp: Option<DateTime<Utc>>,
    pub metadata: Option<Map<String, Value>>,
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl Action {
    /// Construct an action from a draft, filling defaults.
    ///
    /// The caller must have resolved `action_type`; status defaults to
    /// completed and the timestamp to `now`.
    pub fn from_draft(draft: ActionDraft, action_type: ActionType, now: DateTime<Utc>) -> Self {
        let ActionDraft {
            contact_id,
            action_type: _,
            details,
            status,
            timestamp,
            metadata,
            scheduled_for,
        } = draft;

        Self {
            id: Uuid::new_v4(),
            contact_id,
            action_type,
            details: details.unwrap_or_default(),
            status: status.unwrap_or(ActionStatus::Completed),
            timestamp: timestamp.unwrap_or(now),
            metadata: metadata.unwrap_or_default(),
            scheduled_for,
            completed_at: None,
        }
    }
}
