//! Port for contact persistence and identity lookups.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::contact::{Contact, ContactPatch, RelationshipStage};

/// Errors raised by contact repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactRepositoryError {
    /// Repository connection could not be established.
    #[error("contact repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("contact repository query failed: {message}")]
    Query { message: String },

    /// An insert collided with the email or professional-network URL
    /// uniqueness constraint. Consumed exactly once by the reconciliation
    /// retry; any other occurrence is fatal.
    #[error("contact uniqueness constraint violated: {message}")]
    DuplicateKey { message: String },
}

impl ContactRepositoryError {
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

    /// Create a duplicate-key error with the given message.
    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::DuplicateKey {
            message: message.into(),
        }
    }
}

/// Database-level contact filters.
///
/// The tag containment predicate deliberately stays out of this struct: it
/// operates on a denormalized list and is applied by the query engine after
/// these filters, to stay portable across storage engines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactSearchFilter {
    /// Case-insensitive substring match against name, company, or title.
    pub search: Option<String>,
    /// Case-insensitive exact company match.
    pub company: Option<String>,
    /// Exact lifecycle stage match.
    pub stage: Option<RelationshipStage>,
}

/// Port for writing contacts and resolving identity keys.
///
/// Mutations keep the companion relationship record in sync within the same
/// transaction: inserts create it, updates mirror the resulting stage and
/// last-interaction timestamp into it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Find a contact by id, archived rows included.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Find a contact by exact email.
    async fn find_by_email(&self, email: &str)
    -> Result<Option<Contact>, ContactRepositoryError>;

    /// Find a contact by exact professional-network URL.
    async fn find_by_linkedin_url(
        &self,
        url: &str,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Insert a contact together with its relationship record.
    async fn insert(&self, contact: &Contact) -> Result<Contact, ContactRepositoryError>;

    /// Apply a partial update, stamp `updated_at`, and sync the relationship.
    ///
    /// Returns `None` when no contact with the given id exists.
    async fn update(
        &self,
        id: Uuid,
        patch: &ContactPatch,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Load non-archived contacts matching the filter, newest first.
    async fn search(
        &self,
        filter: &ContactSearchFilter,
    ) -> Result<Vec<Contact>, ContactRepositoryError>;

    /// Count non-archived contacts.
    async fn count_active(&self) -> Result<i64, ContactRepositoryError>;

    /// Count non-archived contacts per lifecycle stage.
    async fn stage_counts(
        &self,
    ) -> Result<Vec<(RelationshipStage, i64)>, ContactRepositoryError>;

    /// Load the tag lists of every contact, archived rows included.
    async fn tag_rows(&self) -> Result<Vec<Vec<String>>, ContactRepositoryError>;
}

/// Fixture implementation for tests that do not exercise contact persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContactRepository;

#[async_trait]
impl ContactRepository for FixtureContactRepository {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(None)
    }

    async fn find_by_email(
        &self,
        _email: &str,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(None)
    }

    async fn find_by_linkedin_url(
        &self,
        _url: &str,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, contact: &Contact) -> Result<Contact, ContactRepositoryError> {
        Ok(contact.clone())
    }

    async fn update(
        &self,
        _id: Uuid,
        _patch: &ContactPatch,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(None)
    }

    async fn search(
        &self,
        _filter: &ContactSearchFilter,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        Ok(Vec::new())
    }

    async fn count_active(&self) -> Result<i64, ContactRepositoryError> {
        Ok(0)
    }

    async fn stage_counts(
        &self,
    ) -> Result<Vec<(RelationshipStage, i64)>, ContactRepositoryError> {
        Ok(Vec::new())
    }

    async fn tag_rows(&self) -> Result<Vec<Vec<String>>, ContactRepositoryError> {
        Ok(Vec::new())
    }
}
