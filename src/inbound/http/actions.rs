//! Action log API handlers.
//!
//! ```text
//! POST /api/v1/actions                   Append an interaction record
//! GET  /api/v1/actions                   List recent actions
//! GET  /api/v1/contacts/{id}/actions     List actions for one contact
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::{Action, ActionDraft, ActionStatus, ActionType, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

const MAX_LIST_LIMIT: i64 = 500;
const DEFAULT_LIST_LIMIT: i64 = 100;

/// Payload for `POST /api/v1/actions`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionBody {
    pub contact_id: Uuid,
    pub action_type: ActionType,
    #[serde(default)]
    pub details: Option<Map<String, Value>>,
    #[serde(default)]
    pub status: Option<ActionStatus>,
    /// Effective interaction time; defaults to now. The owning contact's
    /// last-interaction stamp follows this value, last write wins.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl From<ActionBody> for ActionDraft {
    fn from(body: ActionBody) -> Self {
        Self {
            contact_id: body.contact_id,
            action_type: Some(body.action_type),
            details: body.details,
            status: body.status,
            timestamp: body.timestamp,
            metadata: body.metadata,
            scheduled_for: body.scheduled_for,
        }
    }
}

/// Action representation returned by the log endpoints.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub action_type: ActionType,
    pub details: Map<String, Value>,
    pub status: ActionStatus,
    pub timestamp: DateTime<Utc>,
    pub metadata: Map<String, Value>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Action> for ActionResponse {
    fn from(action: Action) -> Self {
        Self {
            id: action.id,
            contact_id: action.contact_id,
            action_type: action.action_type,
            details: action.details,
            status: action.status,
            timestamp: action.timestamp,
            metadata: action.metadata,
            scheduled_for: action.scheduled_for,
            completed_at: action.completed_at,
        }
    }
}

/// Query parameters accepted by the listing endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListActionsQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

fn validate_limit(limit: Option<i64>) -> ApiResult<i64> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(Error::invalid_request(format!(
            "limit must be between 1 and {MAX_LIST_LIMIT}"
        )));
    }
    Ok(limit)
}

/// Append an interaction record for a contact.
#[utoipa::path(
    post,
    path = "/api/v1/actions",
    request_body = ActionBody,
    responses(
        (status = 201, description = "Logged action", body = ActionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Contact not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["actions"],
    operation_id = "logAction"
)]
#[post("/actions")]
pub async fn log_action(
    state: web::Data<HttpState>,
    payload: web::Json<ActionBody>,
) -> ApiResult<HttpResponse> {
    let action = state.action_log.log(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(ActionResponse::from(action)))
}

/// List recent actions across all contacts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/actions",
    params(("limit" = Option<i64>, Query, description = "Page size, 1 to 500, default 100")),
    responses(
        (status = 200, description = "Recent actions", body = [ActionResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["actions"],
    operation_id = "listActions"
)]
#[get("/actions")]
pub async fn list_actions(
    state: web::Data<HttpState>,
    query: web::Query<ListActionsQuery>,
) -> ApiResult<web::Json<Vec<ActionResponse>>> {
    let limit = validate_limit(query.limit)?;
    let actions = state.action_log.list(None, limit).await?;
    Ok(web::Json(
        actions.into_iter().map(ActionResponse::from).collect(),
    ))
}

/// List actions for one contact, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/contacts/{id}/actions",
    params(
        ("id" = Uuid, Path, description = "Contact identifier"),
        ("limit" = Option<i64>, Query, description = "Page size, 1 to 500, default 100")
    ),
    responses(
        (status = 200, description = "The contact's actions", body = [ActionResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["actions"],
    operation_id = "listContactActions"
)]
#[get("/contacts/{id}/actions")]
pub async fn list_contact_actions(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    query: web::Query<ListActionsQuery>,
) -> ApiResult<web::Json<Vec<ActionResponse>>> {
    let limit = validate_limit(query.limit)?;
    let actions = state.action_log.list(Some(path.into_inner()), limit).await?;
    Ok(web::Json(
        actions.into_iter().map(ActionResponse::from).collect(),
    ))
}
