//! Outreach campaigns targeted at tagged contact segments.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::contact::normalize_tags;

/// A named outreach intent.
///
/// Contacts may reference a campaign; deleting a campaign nulls that
/// reference rather than cascading.
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    pub id: Uuid,
    pub user_prompt: String,
    /// Normalized lowercase target tags.
    pub target_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Payload for creating a campaign.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignDraft {
    pub user_prompt: String,
    pub target_tags: Vec<String>,
}

impl Campaign {
    /// Construct a fresh campaign from a draft, normalizing target tags.
    pub fn from_draft(draft: CampaignDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_prompt: draft.user_prompt,
            target_tags: normalize_tags(draft.target_tags),
            created_at: now,
            started_at: None,
            completed_at: None,
        }
    }

    /// A campaign is active until a completion timestamp is recorded.
    pub fn is_active(&self) -> bool {
        self.completed_at.is_none()
    }
}
