//! Contacts API handlers.
//!
//! ```text
//! GET    /api/v1/contacts            List with filters and pagination
//! POST   /api/v1/contacts            Create or merge by identity keys
//! POST   /api/v1/contacts/bulk       Upsert a batch, per-item outcomes
//! GET    /api/v1/contacts/{id}       Fetch one contact
//! PUT    /api/v1/contacts/{id}       Partial update
//! DELETE /api/v1/contacts/{id}       Archive (soft delete)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::ContactListRequest;
use crate::domain::{Contact, ContactDraft, ContactPatch, Error, RelationshipStage};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Largest page a single listing request may ask for.
const MAX_PAGE_LIMIT: i64 = 200;

/// Page size applied when the client does not specify one.
const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Upsert payload for `POST /api/v1/contacts`.
///
/// Optional fields left out (or set to `null`) leave the stored value
/// untouched when the payload merges into an existing contact. A provided
/// `tags` list replaces the stored set, even when empty.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactBody {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub relationship_stage: Option<RelationshipStage>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<Uuid>,
}

impl From<ContactBody> for ContactDraft {
    fn from(body: ContactBody) -> Self {
        Self {
            name: body.name,
            title: body.title,
            company: body.company,
            email: body.email,
            linkedin_url: body.linkedin_url,
            phone: body.phone,
            tags: body.tags,
            source: body.source,
            relationship_stage: body.relationship_stage,
            notes: body.notes,
            campaign_id: body.campaign_id,
        }
    }
}

/// Partial update payload for `PUT /api/v1/contacts/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdateBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub relationship_stage: Option<RelationshipStage>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<Uuid>,
}

impl From<ContactUpdateBody> for ContactPatch {
    fn from(body: ContactUpdateBody) -> Self {
        Self {
            name: None,
            title: body.title,
            company: body.company,
            email: body.email,
            linkedin_url: body.linkedin_url,
            phone: body.phone,
            tags: body.tags,
            source: body.source,
            relationship_stage: body.relationship_stage,
            notes: body.notes,
            campaign_id: body.campaign_id,
            is_archived: None,
            archived_at: None,
        }
    }
}

/// Contact representation returned by every contact endpoint.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: Uuid,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub phone: Option<String>,
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

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            title: contact.title,
            company: contact.company,
            email: contact.email,
            linkedin_url: contact.linkedin_url,
            phone: contact.phone,
            tags: contact.tags,
            source: contact.source,
            relationship_stage: contact.relationship_stage,
            notes: contact.notes,
            last_interaction_at: contact.last_interaction_at,
            campaign_id: contact.campaign_id,
            is_archived: contact.is_archived,
            archived_at: contact.archived_at,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

/// One page of contacts.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactListResponse {
    /// Count after all filters, before pagination.
    pub total: usize,
    pub items: Vec<ContactResponse>,
}

/// Query parameters accepted by the listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContactsQuery {
    #[serde(default)]
    pub skip: Option<usize>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    /// Comma-separated tag list; every tag must be present on a match.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub stage: Option<RelationshipStage>,
}

fn validate_name(name: &str) -> ApiResult<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_request("name must not be empty"));
    }
    Ok(())
}

fn validate_limit(limit: Option<i64>) -> ApiResult<i64> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(Error::invalid_request(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}"
        )));
    }
    Ok(limit)
}

fn split_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

/// List contacts with filters and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/contacts",
    params(
        ("skip" = Option<usize>, Query, description = "Records to skip after filtering"),
        ("limit" = Option<i64>, Query, description = "Page size, 1 to 200, default 50"),
        ("search" = Option<String>, Query, description = "Substring match on name, company, or title"),
        ("company" = Option<String>, Query, description = "Case-insensitive exact company match"),
        ("tags" = Option<String>, Query, description = "Comma-separated tags; all must match"),
        ("stage" = Option<String>, Query, description = "Relationship stage filter")
    ),
    responses(
        (status = 200, description = "Page of contacts", body = ContactListResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "listContacts"
)]
#[get("/contacts")]
pub async fn list_contacts(
    state: web::Data<HttpState>,
    query: web::Query<ListContactsQuery>,
) -> ApiResult<web::Json<ContactListResponse>> {
    let query = query.into_inner();
    let limit = validate_limit(query.limit)?;

    let page = state
        .contacts_query
        .list(ContactListRequest {
            skip: query.skip.unwrap_or(0),
            limit: limit as usize,
            search: query.search,
            company: query.company,
            tags: split_tags(query.tags.as_deref()),
            stage: query.stage,
        })
        .await?;

    Ok(web::Json(ContactListResponse {
        total: page.total,
        items: page.items.into_iter().map(ContactResponse::from).collect(),
    }))
}

/// Create a contact, or merge into an existing one matched by email or
/// professional-network URL.
#[utoipa::path(
    post,
    path = "/api/v1/contacts",
    request_body = ContactBody,
    responses(
        (status = 201, description = "Created or merged contact", body = ContactResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Identity keys match different contacts", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "upsertContact"
)]
#[post("/contacts")]
pub async fn upsert_contact(
    state: web::Data<HttpState>,
    payload: web::Json<ContactBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    validate_name(&body.name)?;

    let contact = state.contacts_command.create_or_update(body.into()).await?;
    Ok(HttpResponse::Created().json(ContactResponse::from(contact)))
}

/// Outcome of one entry in a bulk upsert.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkContactOutcome {
    /// Position of the entry in the request array.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Error>,
}

/// Upsert a batch of contacts, reporting a per-item outcome.
///
/// Entries are processed in order and independently; one failing entry does
/// not abort the rest.
#[utoipa::path(
    post,
    path = "/api/v1/contacts/bulk",
    request_body = Vec<ContactBody>,
    responses(
        (status = 207, description = "Per-item outcomes", body = [BulkContactOutcome]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "bulkUpsertContacts"
)]
#[post("/contacts/bulk")]
pub async fn bulk_upsert_contacts(
    state: web::Data<HttpState>,
    payload: web::Json<Vec<ContactBody>>,
) -> ApiResult<HttpResponse> {
    let mut outcomes = Vec::with_capacity(payload.len());
    for (index, body) in payload.into_inner().into_iter().enumerate() {
        let result = match validate_name(&body.name) {
            Ok(()) => state.contacts_command.create_or_update(body.into()).await,
            Err(err) => Err(err),
        };
        outcomes.push(match result {
            Ok(contact) => BulkContactOutcome {
                index,
                contact: Some(contact.into()),
                error: None,
            },
            Err(err) => BulkContactOutcome {
                index,
                contact: None,
                error: Some(err),
            },
        });
    }

    Ok(HttpResponse::MultiStatus().json(outcomes))
}

/// Fetch one contact by id, archived contacts included.
#[utoipa::path(
    get,
    path = "/api/v1/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact identifier")),
    responses(
        (status = 200, description = "The contact", body = ContactResponse),
        (status = 404, description = "Contact not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "getContact"
)]
#[get("/contacts/{id}")]
pub async fn get_contact(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<ContactResponse>> {
    let contact = state.contacts_query.get(path.into_inner()).await?;
    Ok(web::Json(contact.into()))
}

/// Apply a partial update to one contact.
#[utoipa::path(
    put,
    path = "/api/v1/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact identifier")),
    request_body = ContactUpdateBody,
    responses(
        (status = 200, description = "Updated contact", body = ContactResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Contact not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "updateContact"
)]
#[put("/contacts/{id}")]
pub async fn update_contact(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<ContactUpdateBody>,
) -> ApiResult<web::Json<ContactResponse>> {
    let contact = state
        .contacts_command
        .update(path.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(contact.into()))
}

/// Archive a contact. The record is retained and stays reachable by id.
#[utoipa::path(
    delete,
    path = "/api/v1/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact identifier")),
    responses(
        (status = 200, description = "Archived contact", body = ContactResponse),
        (status = 404, description = "Contact not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "archiveContact"
)]
#[delete("/contacts/{id}")]
pub async fn archive_contact(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<ContactResponse>> {
    let contact = state.contacts_command.archive(path.into_inner()).await?;
    Ok(web::Json(contact.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockContactsCommand, MockContactsQuery};
    use crate::inbound::http::state::HttpStatePorts;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .service(list_contacts)
                .service(upsert_contact)
                .service(bulk_upsert_contacts)
                .service(get_contact)
                .service(update_contact)
                .service(archive_contact),
        )
    }

    fn fixture_state() -> HttpState {
        HttpState::new(HttpStatePorts::default())
    }

    #[rstest]
    #[actix_web::test]
    async fn list_contacts_returns_an_empty_page() {
        let app = actix_test::init_service(test_app(fixture_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/contacts")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("total").and_then(Value::as_u64), Some(0));
        assert_eq!(body.get("items"), Some(&json!([])));
    }

    #[rstest]
    #[actix_web::test]
    async fn list_contacts_rejects_oversized_limits() {
        let app = actix_test::init_service(test_app(fixture_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/contacts?limit=500")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn list_contacts_splits_comma_separated_tags() {
        let mut query = MockContactsQuery::new();
        query
            .expect_list()
            .withf(|request| {
                request.tags == vec!["fintech".to_owned(), "warm".to_owned()]
                    && request.skip == 5
                    && request.limit == 10
            })
            .times(1)
            .returning(|_| Ok(crate::domain::ports::ContactPage::default()));

        let state = HttpState::new(HttpStatePorts {
            contacts_query: Arc::new(query),
            ..HttpStatePorts::default()
        });
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/contacts?tags=fintech,%20warm,&skip=5&limit=10")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn upsert_contact_returns_created_with_camel_case_json() {
        let app = actix_test::init_service(test_app(fixture_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/contacts")
                .set_json(json!({
                    "name": "Ada Lovelace",
                    "email": "ada@example.com",
                    "linkedinUrl": "https://linkedin.com/in/ada",
                    "tags": ["Analytics"]
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("name").and_then(Value::as_str),
            Some("Ada Lovelace")
        );
        assert_eq!(
            body.get("linkedinUrl").and_then(Value::as_str),
            Some("https://linkedin.com/in/ada")
        );
        assert_eq!(
            body.get("relationshipStage").and_then(Value::as_str),
            Some("new_lead")
        );
        assert!(body.get("linkedin_url").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn upsert_contact_rejects_blank_names() {
        let app = actix_test::init_service(test_app(fixture_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/contacts")
                .set_json(json!({ "name": "   " }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn upsert_contact_surfaces_identity_conflicts() {
        let mut command = MockContactsCommand::new();
        command.expect_create_or_update().times(1).returning(|_| {
            Err(
                Error::conflict("email and linkedin_url resolve to different contacts")
                    .with_details(json!({ "emailContactId": Uuid::new_v4() })),
            )
        });

        let state = HttpState::new(HttpStatePorts {
            contacts_command: Arc::new(command),
            ..HttpStatePorts::default()
        });
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/contacts")
                .set_json(json!({
                    "name": "A",
                    "email": "a@example.com",
                    "linkedinUrl": "https://linkedin.com/in/b"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("code").and_then(Value::as_str), Some("conflict"));
        assert!(body.pointer("/details/emailContactId").is_some());
    }

    #[rstest]
    #[actix_web::test]
    async fn get_contact_reports_missing_ids() {
        let app = actix_test::init_service(test_app(fixture_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/contacts/{}", Uuid::new_v4()))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("code").and_then(Value::as_str), Some("not_found"));
    }

    #[rstest]
    #[actix_web::test]
    async fn update_contact_is_routed_as_put() {
        let mut command = MockContactsCommand::new();
        command
            .expect_update()
            .times(1)
            .returning(|id, _| {
                let mut updated = crate::domain::Contact::from_draft(
                    crate::domain::ContactDraft {
                        name: "Ada Lovelace".to_owned(),
                        ..crate::domain::ContactDraft::default()
                    },
                    chrono::Utc::now(),
                );
                updated.id = id;
                updated.company = Some("Babbage & Co".to_owned());
                Ok(updated)
            });

        let state = HttpState::new(HttpStatePorts {
            contacts_command: Arc::new(command),
            ..HttpStatePorts::default()
        });
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/contacts/{}", Uuid::new_v4()))
                .set_json(json!({ "company": "Babbage & Co" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("company").and_then(Value::as_str),
            Some("Babbage & Co")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn update_contact_reports_missing_ids() {
        let app = actix_test::init_service(test_app(fixture_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/contacts/{}", Uuid::new_v4()))
                .set_json(json!({ "company": "Babbage & Co" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[actix_web::test]
    async fn bulk_upsert_reports_per_item_outcomes() {
        let mut command = MockContactsCommand::new();
        command
            .expect_create_or_update()
            .times(1)
            .returning(|draft| {
                Ok(crate::domain::Contact::from_draft(draft, chrono::Utc::now()))
            });

        let state = HttpState::new(HttpStatePorts {
            contacts_command: Arc::new(command),
            ..HttpStatePorts::default()
        });
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/contacts/bulk")
                .set_json(json!([
                    { "name": "Ada Lovelace" },
                    { "name": "  " }
                ]))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::MULTI_STATUS);

        let body: Value = actix_test::read_body_json(response).await;
        let outcomes = body.as_array().expect("array of outcomes");
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].get("contact").is_some());
        assert!(outcomes[0].get("error").is_none());
        assert!(outcomes[1].get("contact").is_none());
        assert_eq!(
            outcomes[1]
                .pointer("/error/code")
                .and_then(Value::as_str),
            Some("invalid_request")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn archive_contact_reports_missing_ids() {
        let app = actix_test::init_service(test_app(fixture_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/contacts/{}", Uuid::new_v4()))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case(None, DEFAULT_PAGE_LIMIT)]
    #[case(Some(1), 1)]
    #[case(Some(200), 200)]
    fn limits_in_range_pass_validation(#[case] limit: Option<i64>, #[case] expected: i64) {
        assert_eq!(validate_limit(limit).expect("valid limit"), expected);
    }

    #[rstest]
    #[case(Some(0))]
    #[case(Some(-1))]
    #[case(Some(201))]
    fn limits_out_of_range_fail_validation(#[case] limit: Option<i64>) {
        assert!(validate_limit(limit).is_err());
    }

    #[rstest]
    fn split_tags_trims_and_drops_empty_segments() {
        assert_eq!(
            split_tags(Some("fintech, warm,,")),
            vec!["fintech".to_owned(), "warm".to_owned()]
        );
        assert!(split_tags(None).is_empty());
    }
}
