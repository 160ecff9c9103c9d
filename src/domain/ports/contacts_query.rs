//! Driving ports for contact reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::contact::{Contact, RelationshipStage};
use crate::domain::error::Error;

/// Parameters for a filtered, paginated contact listing.
///
/// `skip` and `limit` slice the already-filtered, already-ordered sequence;
/// the HTTP layer clamps `limit` before this struct is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactListRequest {
    pub skip: usize,
    pub limit: usize,
    pub search: Option<String>,
    pub company: Option<String>,
    /// Tag containment filter with AND semantics.
    pub tags: Vec<String>,
    pub stage: Option<RelationshipStage>,
}

/// One page of contacts plus the post-filter total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactPage {
    /// Count after all filters, before pagination.
    pub total: usize,
    pub items: Vec<Contact>,
}

/// Driving port for listing and fetching contacts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactsQuery: Send + Sync {
    /// List non-archived contacts, newest first, honouring all filters.
    async fn list(&self, request: ContactListRequest) -> Result<ContactPage, Error>;

    /// Fetch a contact by id, archived rows included.
    async fn get(&self, id: Uuid) -> Result<Contact, Error>;
}

/// Fixture implementation for handler tests: an empty contact book.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContactsQuery;

#[async_trait]
impl ContactsQuery for FixtureContactsQuery {
    async fn list(&self, _request: ContactListRequest) -> Result<ContactPage, Error> {
        Ok(ContactPage::default())
    }

    async fn get(&self, id: Uuid) -> Result<Contact, Error> {
        Err(Error::not_found(format!("contact {id} not found")))
    }
}
