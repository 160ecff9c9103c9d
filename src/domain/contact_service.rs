//! Contact reconciliation and query services.
//!
//! This module implements the driving ports for contacts: resolving an
//! incoming record against existing rows by its two identity keys, merging
//! payloads with partial-update semantics, recovering from the
//! duplicate-insert race with a single bounded retry, and building the
//! filtered, paginated listing.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::domain::contact::{Contact, ContactDraft, ContactPatch, normalize_tags};
use crate::domain::error::Error;
use crate::domain::ports::{
    ContactListRequest, ContactPage, ContactRepository, ContactRepositoryError,
    ContactSearchFilter, ContactsCommand, ContactsQuery,
};

/// Contact service implementing the driving ports.
#[derive(Clone)]
pub struct ContactService<R> {
    repo: Arc<R>,
}

impl<R> ContactService<R> {
    /// Create a new service with the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_repo_error(error: ContactRepositoryError) -> Error {
    match error {
        ContactRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("contact repository unavailable: {message}"))
        }
        ContactRepositoryError::Query { message } => {
            Error::internal(format!("contact repository error: {message}"))
        }
        // Reaching this mapping means the retry in `create_or_update`
        // already re-resolved and found nothing, so the violation is not a
        // benign duplicate-insert race.
        ContactRepositoryError::DuplicateKey { message } => {
            Error::internal(format!("unrecovered uniqueness violation: {message}"))
        }
    }
}

fn identity_conflict(email_match: &Contact, url_match: &Contact) -> Error {
    Error::conflict("email and linkedin_url resolve to different contacts").with_details(json!({
        "emailContactId": email_match.id,
        "linkedinContactId": url_match.id,
        "code": "identity_conflict",
    }))
}

fn not_found(id: Uuid) -> Error {
    Error::not_found(format!("contact {id} not found"))
}

/// Build the merge patch for an upsert payload landing on an existing row.
///
/// Only fields present in the payload are carried over; tags must already be
/// normalized by the caller.
fn merge_patch(draft: &ContactDraft) -> ContactPatch {
    ContactPatch {
        name: Some(draft.name.clone()),
        title: draft.title.clone(),
        company: draft.company.clone(),
        email: draft.email.clone(),
        linkedin_url: draft.linkedin_url.clone(),
        phone: draft.phone.clone(),
        tags: draft.tags.clone(),
        source: draft.source.clone(),
        relationship_stage: draft.relationship_stage,
        notes: draft.notes.clone(),
        campaign_id: draft.campaign_id,
        is_archived: None,
        archived_at: None,
    }
}

impl<R> ContactService<R>
where
    R: ContactRepository,
{
    /// Resolve a candidate's identity keys against existing contacts.
    ///
    /// Fails with a conflict when both keys are present and each matches a
    /// different existing record. Runs before any write so ambiguous merges
    /// never silently pick one side.
    async fn resolve_identity(
        &self,
        email: Option<&str>,
        linkedin_url: Option<&str>,
    ) -> Result<Option<Contact>, Error> {
        let url_match = match linkedin_url {
            Some(url) => self
                .repo
                .find_by_linkedin_url(url)
                .await
                .map_err(map_repo_error)?,
            None => None,
        };
        let email_match = match email {
            Some(email) => self.repo.find_by_email(email).await.map_err(map_repo_error)?,
            None => None,
        };

        match (url_match, email_match) {
            (Some(by_url), Some(by_email)) if by_url.id != by_email.id => {
                Err(identity_conflict(&by_email, &by_url))
            }
            (Some(by_url), _) => Ok(Some(by_url)),
            (None, by_email) => Ok(by_email),
        }
    }

    async fn merge_into(&self, id: Uuid, draft: &ContactDraft) -> Result<Contact, Error> {
        let patch = merge_patch(draft);
        self.repo
            .update(id, &patch)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl<R> ContactsCommand for ContactService<R>
where
    R: ContactRepository + 'static,
{
    async fn create_or_update(&self, mut draft: ContactDraft) -> Result<Contact, Error> {
        if let Some(tags) = draft.tags.take() {
            draft.tags = Some(normalize_tags(tags));
        }

        let existing = self
            .resolve_identity(draft.email.as_deref(), draft.linkedin_url.as_deref())
            .await?;
        if let Some(existing) = existing {
            return self.merge_into(existing.id, &draft).await;
        }

        let contact = Contact::from_draft(draft.clone(), Utc::now());
        match self.repo.insert(&contact).await {
            Ok(inserted) => Ok(inserted),
            Err(ContactRepositoryError::DuplicateKey { message }) => {
                // A concurrent request inserted a colliding email or URL
                // between the resolve and the insert. Re-resolve once and
                // merge into the winner; a second collision is fatal.
                warn!(
                    contact_name = %draft.name,
                    %message,
                    "duplicate-insert race detected, re-resolving identity"
                );
                let existing = self
                    .resolve_identity(draft.email.as_deref(), draft.linkedin_url.as_deref())
                    .await?;
                match existing {
                    Some(existing) => self.merge_into(existing.id, &draft).await,
                    None => Err(map_repo_error(ContactRepositoryError::DuplicateKey {
                        message,
                    })),
                }
            }
            Err(err) => Err(map_repo_error(err)),
        }
    }

    async fn update(&self, id: Uuid, mut patch: ContactPatch) -> Result<Contact, Error> {
        if let Some(tags) = patch.tags.take() {
            patch.tags = Some(normalize_tags(tags));
        }
        self.repo
            .update(id, &patch)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn archive(&self, id: Uuid) -> Result<Contact, Error> {
        let patch = ContactPatch {
            is_archived: Some(true),
            archived_at: Some(Utc::now()),
            ..ContactPatch::default()
        };
        self.repo
            .update(id, &patch)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl<R> ContactsQuery for ContactService<R>
where
    R: ContactRepository + 'static,
{
    async fn list(&self, request: ContactListRequest) -> Result<ContactPage, Error> {
        let filter = ContactSearchFilter {
            search: request.search,
            company: request.company,
            stage: request.stage,
        };
        let records = self.repo.search(&filter).await.map_err(map_repo_error)?;

        // Tag containment is a set predicate over a denormalized list, so it
        // runs here rather than in the storage layer. Archived contacts never
        // appear in listings, whichever adapter served the rows.
        let requested = normalize_tags(request.tags);
        let filtered: Vec<Contact> = records
            .into_iter()
            .filter(|contact| !contact.is_archived && contact.has_all_tags(&requested))
            .collect();

        let total = filtered.len();
        let items = filtered
            .into_iter()
            .skip(request.skip)
            .take(request.limit)
            .collect();
        Ok(ContactPage { total, items })
    }

    async fn get(&self, id: Uuid) -> Result<Contact, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| not_found(id))
    }
}
