//! Driving ports for contact mutations.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::contact::{Contact, ContactDraft, ContactPatch};
use crate::domain::error::Error;

/// Driving port for creating, merging, updating, and archiving contacts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactsCommand: Send + Sync {
    /// Create a contact or merge the payload into the row its identity keys
    /// resolve to. Fails with a conflict when email and professional-network
    /// URL resolve to different existing contacts.
    async fn create_or_update(&self, draft: ContactDraft) -> Result<Contact, Error>;

    /// Apply a partial update to an existing contact.
    async fn update(&self, id: Uuid, patch: ContactPatch) -> Result<Contact, Error>;

    /// Soft-delete a contact; it disappears from listings but stays
    /// fetchable by id.
    async fn archive(&self, id: Uuid) -> Result<Contact, Error>;
}

/// Fixture implementation for handler tests.
///
/// Echoes upserts as fresh contacts and reports updates and archives as
/// not found.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContactsCommand;

#[async_trait]
impl ContactsCommand for FixtureContactsCommand {
    async fn create_or_update(&self, draft: ContactDraft) -> Result<Contact, Error> {
        Ok(Contact::from_draft(draft, Utc::now()))
    }

    async fn update(&self, id: Uuid, _patch: ContactPatch) -> Result<Contact, Error> {
        Err(Error::not_found(format!("contact {id} not found")))
    }

    async fn archive(&self, id: Uuid) -> Result<Contact, Error> {
        Err(Error::not_found(format!("contact {id} not found")))
    }
}
