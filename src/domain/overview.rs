//! Point-in-time dashboard snapshot types.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::domain::action::Action;
use crate::domain::contact::RelationshipStage;

/// Number of actions logged on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyActionCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Derived dashboard snapshot.
///
/// Recomputed from current store state on every request; nothing here is
/// cached.
#[derive(Debug, Clone, PartialEq)]
pub struct CrmOverview {
    /// Non-archived contacts.
    pub total_contacts: i64,
    /// Campaigns without a completion timestamp.
    pub active_campaigns: i64,
    /// Non-archived contacts per lifecycle stage.
    pub stage_counts: BTreeMap<RelationshipStage, i64>,
    /// Contacts carrying each tag, archived rows included.
    pub tag_counts: BTreeMap<String, i64>,
    /// The ten most recent actions, newest first.
    pub recent_actions: Vec<Action>,
    /// Per-day action volume for the most recent days with activity,
    /// newest day first.
    pub daily_action_counts: Vec<DailyActionCount>,
}
