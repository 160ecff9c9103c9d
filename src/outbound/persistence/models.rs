//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{actions, campaigns, contacts, relationships};

/// Row struct for reading from the contacts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContactRow {
    pub id: Uuid,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub phone: Option<String>,
    pub tags: Vec<String>,
    pub source: Option<String>,
    pub relationship_stage: String,
    pub notes: Option<String>,
    pub last_interaction_at: Option<DateTime<Utc>>,
    pub campaign_id: Option<Uuid>,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new contact records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts)]
pub(crate) struct NewContactRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub title: Option<&'a str>,
    pub company: Option<&'a str>,
    pub email: Option<&'a str>,
    pub linkedin_url: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub tags: &'a [String],
    pub source: Option<&'a str>,
    pub relationship_stage: &'a str,
    pub notes: Option<&'a str>,
    pub last_interaction_at: Option<DateTime<Utc>>,
    pub campaign_id: Option<Uuid>,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for partial contact updates.
///
/// `None` fields are skipped by Diesel, which gives the "absent means
/// untouched" merge semantics. `updated_at` is always stamped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = contacts)]
pub(crate) struct ContactChangeset<'a> {
    pub name: Option<&'a str>,
    pub title: Option<&'a str>,
    pub company: Option<&'a str>,
    pub email: Option<&'a str>,
    pub linkedin_url: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub tags: Option<&'a [String]>,
    pub source: Option<&'a str>,
    pub relationship_stage: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub campaign_id: Option<Uuid>,
    pub is_archived: Option<bool>,
    pub archived_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating the companion relationship record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = relationships)]
pub(crate) struct NewRelationshipRow<'a> {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub stage: &'a str,
    pub last_interaction: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset mirroring contact state into its relationship record.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = relationships)]
pub(crate) struct RelationshipSync<'a> {
    pub stage: &'a str,
    pub last_interaction: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the actions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = actions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ActionRow {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub action_type: String,
    pub details: serde_json::Value,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: serde_json::Value,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    #[expect(dead_code, reason = "audit column read only by database tooling")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for appending action records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = actions)]
pub(crate) struct NewActionRow<'a> {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub action_type: &'a str,
    pub details: &'a serde_json::Value,
    pub status: &'a str,
    pub timestamp: DateTime<Utc>,
    pub metadata: &'a serde_json::Value,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the campaigns table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = campaigns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CampaignRow {
    pub id: Uuid,
    pub user_prompt: String,
    pub target_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating campaign records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = campaigns)]
pub(crate) struct NewCampaignRow<'a> {
    pub id: Uuid,
    pub user_prompt: &'a str,
    pub target_tags: &'a [String],
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}
