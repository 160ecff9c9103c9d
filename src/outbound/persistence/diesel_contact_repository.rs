//! PostgreSQL-backed `ContactRepository` implementation using Diesel ORM.
//!
//! Every mutation keeps the companion relationship record in step with the
//! contact inside a single transaction, so readers never observe the two out
//! of sync.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ContactRepository, ContactRepositoryError, ContactSearchFilter};
use crate::domain::{Contact, ContactPatch, RelationshipStage};

use super::error_mapping::{
    ConstraintViolation, constraint_violation, map_diesel_error, map_pool_error,
};
use super::models::{
    ContactChangeset, ContactRow, NewContactRow, NewRelationshipRow, RelationshipSync,
};
use super::pool::{DbPool, PoolError};
use super::schema::{contacts, relationships};

diesel::define_sql_function! {
    /// Case folding for the exact-company filter.
    fn lower(value: diesel::sql_types::Nullable<diesel::sql_types::Text>)
        -> diesel::sql_types::Nullable<diesel::sql_types::Text>;
}

/// Diesel-backed implementation of the contact repository port.
#[derive(Clone)]
pub struct DieselContactRepository {
    pool: DbPool,
}

impl DieselContactRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ContactRepositoryError {
    map_pool_error(error, ContactRepositoryError::connection)
}

/// Map Diesel errors, surfacing unique violations as `DuplicateKey` so the
/// reconciliation retry can consume them.
fn map_write_error(error: diesel::result::Error) -> ContactRepositoryError {
    match constraint_violation(&error) {
        Some(ConstraintViolation::Unique(message)) => {
            ContactRepositoryError::duplicate_key(message)
        }
        Some(ConstraintViolation::ForeignKey(message)) => ContactRepositoryError::query(message),
        None => map_read_error(error),
    }
}

fn map_read_error(error: diesel::result::Error) -> ContactRepositoryError {
    map_diesel_error(
        error,
        ContactRepositoryError::query,
        ContactRepositoryError::connection,
    )
}

/// Convert a database row into a domain contact.
fn row_to_contact(row: ContactRow) -> Result<Contact, ContactRepositoryError> {
    let ContactRow {
        id,
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
        last_interaction_at,
        campaign_id,
        is_archived,
        archived_at,
        created_at,
        updated_at,
    } = row;

    let relationship_stage: RelationshipStage = relationship_stage
        .parse()
        .map_err(|err: crate::domain::contact::ParseRelationshipStageError| {
            ContactRepositoryError::query(err.to_string())
        })?;

    Ok(Contact {
        id,
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
        last_interaction_at,
        campaign_id,
        is_archived,
        archived_at,
        created_at,
        updated_at,
    })
}

fn contact_to_new_row(contact: &Contact) -> NewContactRow<'_> {
    NewContactRow {
        id: contact.id,
        name: &contact.name,
        title: contact.title.as_deref(),
        company: contact.company.as_deref(),
        email: contact.email.as_deref(),
        linkedin_url: contact.linkedin_url.as_deref(),
        phone: contact.phone.as_deref(),
        tags: &contact.tags,
        source: contact.source.as_deref(),
        relationship_stage: contact.relationship_stage.as_str(),
        notes: contact.notes.as_deref(),
        last_interaction_at: contact.last_interaction_at,
        campaign_id: contact.campaign_id,
        is_archived: contact.is_archived,
        archived_at: contact.archived_at,
        created_at: contact.created_at,
        updated_at: contact.updated_at,
    }
}

fn patch_to_changeset<'a>(
    patch: &'a ContactPatch,
    updated_at: chrono::DateTime<Utc>,
) -> ContactChangeset<'a> {
    ContactChangeset {
        name: patch.name.as_deref(),
        title: patch.title.as_deref(),
        company: patch.company.as_deref(),
        email: patch.email.as_deref(),
        linkedin_url: patch.linkedin_url.as_deref(),
        phone: patch.phone.as_deref(),
        tags: patch.tags.as_deref(),
        source: patch.source.as_deref(),
        relationship_stage: patch.relationship_stage.as_ref().map(|s| s.as_str()),
        notes: patch.notes.as_deref(),
        campaign_id: patch.campaign_id,
        is_archived: patch.is_archived,
        archived_at: patch.archived_at,
        updated_at,
    }
}

impl DieselContactRepository {
    async fn find_one<F>(&self, predicate: F) -> Result<Option<Contact>, ContactRepositoryError>
    where
        F: FnOnce(contacts::BoxedQuery<'static, diesel::pg::Pg>) -> contacts::BoxedQuery<'static, diesel::pg::Pg>,
    {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = predicate(contacts::table.into_boxed())
            .select(ContactRow::as_select())
            .first::<ContactRow>(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(row_to_contact).transpose()
    }
}

#[async_trait]
impl ContactRepository for DieselContactRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, ContactRepositoryError> {
        self.find_one(move |query| query.filter(contacts::id.eq(id)))
            .await
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let email = email.to_owned();
        self.find_one(move |query| query.filter(contacts::email.eq(email)))
            .await
    }

    async fn find_by_linkedin_url(
        &self,
        url: &str,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let url = url.to_owned();
        self.find_one(move |query| query.filter(contacts::linkedin_url.eq(url)))
            .await
    }

    async fn insert(&self, contact: &Contact) -> Result<Contact, ContactRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let new_row = contact_to_new_row(contact);
        let relationship = NewRelationshipRow {
            id: Uuid::new_v4(),
            contact_id: contact.id,
            stage: contact.relationship_stage.as_str(),
            last_interaction: contact.last_interaction_at,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        };

        // The contact and its relationship record are born together or not
        // at all.
        let row = conn
            .transaction::<ContactRow, diesel::result::Error, _>(|conn| {
                async move {
                    let row = diesel::insert_into(contacts::table)
                        .values(&new_row)
                        .returning(ContactRow::as_returning())
                        .get_result::<ContactRow>(conn)
                        .await?;

                    diesel::insert_into(relationships::table)
                        .values(&relationship)
                        .execute(conn)
                        .await?;

                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_write_error)?;

        row_to_contact(row)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &ContactPatch,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let now = Utc::now();
        let changeset = patch_to_changeset(patch, now);

        let row = conn
            .transaction::<Option<ContactRow>, diesel::result::Error, _>(|conn| {
                async move {
                    let row = diesel::update(contacts::table.filter(contacts::id.eq(id)))
                        .set(&changeset)
                        .returning(ContactRow::as_returning())
                        .get_result::<ContactRow>(conn)
                        .await
                        .optional()?;

                    if let Some(row) = &row {
                        let sync = RelationshipSync {
                            stage: &row.relationship_stage,
                            last_interaction: row.last_interaction_at,
                            updated_at: now,
                        };
                        diesel::insert_into(relationships::table)
                            .values(NewRelationshipRow {
                                id: Uuid::new_v4(),
                                contact_id: row.id,
                                stage: &row.relationship_stage,
                                last_interaction: row.last_interaction_at,
                                created_at: now,
                                updated_at: now,
                            })
                            .on_conflict(relationships::contact_id)
                            .do_update()
                            .set(&sync)
                            .execute(conn)
                            .await?;
                    }

                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_write_error)?;

        row.map(row_to_contact).transpose()
    }

    async fn search(
        &self,
        filter: &ContactSearchFilter,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let mut query = contacts::table
            .filter(contacts::is_archived.eq(false))
            .into_boxed();

        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            query = query.filter(
                contacts::name
                    .ilike(pattern.clone())
                    .or(contacts::company.ilike(pattern.clone()))
                    .or(contacts::title.ilike(pattern)),
            );
        }
        if let Some(company) = &filter.company {
            query = query.filter(lower(contacts::company).eq(company.to_lowercase()));
        }
        if let Some(stage) = filter.stage {
            query = query.filter(contacts::relationship_stage.eq(stage.as_str()));
        }

        let rows: Vec<ContactRow> = query
            .order((contacts::created_at.desc(), contacts::id.desc()))
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;

        rows.into_iter().map(row_to_contact).collect()
    }

    async fn count_active(&self) -> Result<i64, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        contacts::table
            .filter(contacts::is_archived.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_read_error)
    }

    async fn stage_counts(
        &self,
    ) -> Result<Vec<(RelationshipStage, i64)>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<(String, i64)> = contacts::table
            .filter(contacts::is_archived.eq(false))
            .group_by(contacts::relationship_stage)
            .select((contacts::relationship_stage, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;

        rows.into_iter()
            .map(|(stage, count)| {
                stage
                    .parse()
                    .map(|stage| (stage, count))
                    .map_err(
                        |err: crate::domain::contact::ParseRelationshipStageError| {
                            ContactRepositoryError::query(err.to_string())
                        },
                    )
            })
            .collect()
    }

    async fn tag_rows(&self) -> Result<Vec<Vec<String>>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        contacts::table
            .select(contacts::tags)
            .load(&mut conn)
            .await
            .map_err(map_read_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> ContactRow {
        let now = Utc::now();
        ContactRow {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".to_owned(),
            title: Some("Engineer".to_owned()),
            company: Some("Analytical Engines".to_owned()),
            email: Some("ada@example.com".to_owned()),
            linkedin_url: None,
            phone: None,
            tags: vec!["analytics".to_owned()],
            source: None,
            relationship_stage: "engaged".to_owned(),
            notes: None,
            last_interaction_at: None,
            campaign_id: None,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn row_conversion_parses_the_stage(valid_row: ContactRow) {
        let contact = row_to_contact(valid_row).expect("valid row converts");
        assert_eq!(contact.relationship_stage, RelationshipStage::Engaged);
    }

    #[rstest]
    fn row_conversion_rejects_unknown_stages(mut valid_row: ContactRow) {
        valid_row.relationship_stage = "platinum".to_owned();

        let error = row_to_contact(valid_row).expect_err("unknown stage fails");
        assert!(matches!(error, ContactRepositoryError::Query { .. }));
        assert!(error.to_string().contains("platinum"));
    }

    #[rstest]
    fn unique_violations_map_to_duplicate_key() {
        let diesel_err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates \"uq_contacts_email\"".to_owned()),
        );

        let mapped = map_write_error(diesel_err);
        assert!(matches!(mapped, ContactRepositoryError::DuplicateKey { .. }));
        assert!(mapped.to_string().contains("uq_contacts_email"));
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped = map_pool(PoolError::checkout("connection refused"));
        assert!(matches!(mapped, ContactRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn changeset_skips_absent_fields() {
        let now = Utc::now();
        let patch = ContactPatch {
            company: Some("Babbage & Co".to_owned()),
            ..ContactPatch::default()
        };

        let changeset = patch_to_changeset(&patch, now);
        assert_eq!(changeset.company, Some("Babbage & Co"));
        assert_eq!(changeset.name, None);
        assert_eq!(changeset.tags, None);
        assert_eq!(changeset.updated_at, now);
    }
}
