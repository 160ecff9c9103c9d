//! Contact aggregate and the payload shapes used to reconcile it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle stage of a contact relationship.
///
/// Persisted as snake_case text and mirrored into the companion relationship
/// record whenever a contact is written.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStage {
    #[default]
    NewLead,
    Contacted,
    Engaged,
    Customer,
    Inactive,
}

/// Error raised when parsing an unknown relationship stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown relationship stage: {0}")]
pub struct ParseRelationshipStageError(pub String);

impl RelationshipStage {
    /// Canonical snake_case representation used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewLead => "new_lead",
            Self::Contacted => "contacted",
            Self::Engaged => "engaged",
            Self::Customer => "customer",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for RelationshipStage {
    type Err = ParseRelationshipStageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "new_lead" => Ok(Self::NewLead),
            "contacted" => Ok(Self::Contacted),
            "engaged" => Ok(Self::Engaged),
            "customer" => Ok(Self::Customer),
            "inactive" => Ok(Self::Inactive),
            other => Err(ParseRelationshipStageError(other.to_owned())),
        }
    }
}

impl std::fmt::Display for RelationshipStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person record tracked by the CRM.
///
/// `email` and `linkedin_url`, when present, are unique across archived and
/// non-archived contacts alike. The lifecycle stage is always mirrored into
/// the companion relationship record by the persistence layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub phone: Option<String>,
    /// Normalized lowercase tags, deduplicated and sorted.
    pub tags: Vec<String>,
    pub source: Option<String>,
    pub relationship_stage: RelationshipStage,
    pub notes: Option<String>,
    pub last_interaction_at: Option<DateTime<Utc>>,
    pub campaign_id: Option<Uuid>,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Construct a fresh contact from an upsert payload.
    ///
    /// Generates the identifier, normalizes tags, and stamps both audit
    /// timestamps with `now`.
    pub fn from_draft(draft: ContactDraft, now: DateTime<Utc>) -> Self {
        let ContactDraft {
            name,
            title,
            company,
            email,
            linkedin_url,
            phone,
            tags,
            source,
            relationship_stage,
            notes,
            campaign_id,
        } = draft;

        Self {
            id: Uuid::new_v4(),
            name,
            title,
            company,
            email,
            linkedin_url,
            phone,
            tags: normalize_tags(tags.unwrap_or_default()),
            source,
            relationship_stage: relationship_stage.unwrap_or_default(),
            notes,
            last_interaction_at: None,
            campaign_id,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the contact's tag set contains every requested tag.
    ///
    /// Tags are compared post-normalization, so callers must normalize the
    /// requested set first. An empty request matches every contact.
    pub fn has_all_tags(&self, requested: &[String]) -> bool {
        requested.iter().all(|tag| self.tags.contains(tag))
    }
}

/// Upsert payload for creating or merging a contact.
///
/// Optional fields left as `None` are treated as "not provided" during a
/// merge; an explicit JSON `null` collapses to the same thing for scalar
/// fields. A provided tags list, even an empty one, replaces the stored set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactDraft {
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub phone: Option<String>,
    pub tags: Option<Vec<String>>,
    pub source: Option<String>,
    pub relationship_stage: Option<RelationshipStage>,
    pub notes: Option<String>,
    pub campaign_id: Option<Uuid>,
}

/// Partial update payload for an existing contact.
///
/// Every field follows the "absent means untouched" merge semantics of
/// [`ContactDraft`]. The public update endpoint never carries `name` or
/// `archived_at`; those are set by the reconciliation merge and the archive
/// operation respectively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub phone: Option<String>,
    pub tags: Option<Vec<String>>,
    pub source: Option<String>,
    pub relationship_stage: Option<RelationshipStage>,
    pub notes: Option<String>,
    pub campaign_id: Option<Uuid>,
    pub is_archived: Option<bool>,
    pub archived_at: Option<DateTime<Utc>>,
}

/// Normalize a tag list: trim whitespace, drop empties, lowercase,
/// deduplicate, and sort into a deterministic sequence.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = tags
        .into_iter()
        .filter_map(|tag| {
            let trimmed = tag.as_ref().trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_lowercase())
            }
        })
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn normalize_tags_trims_lowercases_dedupes_and_sorts() {
        let tags = normalize_tags([" Foo", "BAR", "", "bar"]);
        assert_eq!(tags, vec!["bar".to_owned(), "foo".to_owned()]);
    }

    #[rstest]
    fn normalize_tags_keeps_empty_input_empty() {
        let tags = normalize_tags(Vec::<String>::new());
        assert!(tags.is_empty());
    }

    #[rstest]
    #[case("new_lead", RelationshipStage::NewLead)]
    #[case("contacted", RelationshipStage::Contacted)]
    #[case("engaged", RelationshipStage::Engaged)]
    #[case("customer", RelationshipStage::Customer)]
    #[case("inactive", RelationshipStage::Inactive)]
    fn stage_round_trips_through_text(#[case] text: &str, #[case] stage: RelationshipStage) {
        assert_eq!(text.parse::<RelationshipStage>(), Ok(stage));
        assert_eq!(stage.as_str(), text);
    }

    #[rstest]
    fn stage_rejects_unknown_values() {
        let err = "platinum".parse::<RelationshipStage>().expect_err("unknown");
        assert!(err.to_string().contains("platinum"));
    }

    #[rstest]
    fn from_draft_defaults_and_normalizes() {
        let now = Utc::now();
        let contact = Contact::from_draft(
            ContactDraft {
                name: "Ada Lovelace".to_owned(),
                tags: Some(vec!["  Analytics ".to_owned(), "analytics".to_owned()]),
                ..ContactDraft::default()
            },
            now,
        );

        assert_eq!(contact.name, "Ada Lovelace");
        assert_eq!(contact.tags, vec!["analytics".to_owned()]);
        assert_eq!(contact.relationship_stage, RelationshipStage::NewLead);
        assert!(!contact.is_archived);
        assert_eq!(contact.created_at, now);
        assert_eq!(contact.updated_at, now);
    }

    #[rstest]
    #[case(&["a"], true)]
    #[case(&["a", "b"], true)]
    #[case(&["a", "c"], false)]
    #[case(&[], true)]
    fn has_all_tags_requires_superset(#[case] requested: &[&str], #[case] expected: bool) {
        let contact = Contact::from_draft(
            ContactDraft {
                name: "Tagged".to_owned(),
                tags: Some(vec!["a".to_owned(), "b".to_owned()]),
                ..ContactDraft::default()
            },
            Utc::now(),
        );
        let requested: Vec<String> = requested.iter().map(|t| (*t).to_owned()).collect();
        assert_eq!(contact.has_all_tags(&requested), expected);
    }
}
