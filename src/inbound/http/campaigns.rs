//! Campaigns API handlers.
//!
//! ```text
//! POST /api/v1/campaigns   Create a campaign
//! GET  /api/v1/campaigns   List campaigns, newest first
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Campaign, CampaignDraft, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Payload for `POST /api/v1/campaigns`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignBody {
    /// Free-text outreach intent driving the campaign.
    pub user_prompt: String,
    #[serde(default)]
    pub target_tags: Vec<String>,
}

impl From<CampaignBody> for CampaignDraft {
    fn from(body: CampaignBody) -> Self {
        Self {
            user_prompt: body.user_prompt,
            target_tags: body.target_tags,
        }
    }
}

/// Campaign representation returned by the campaign endpoints.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResponse {
    pub id: Uuid,
    pub user_prompt: String,
    pub target_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Campaign> for CampaignResponse {
    fn from(campaign: Campaign) -> Self {
        Self {
            id: campaign.id,
            user_prompt: campaign.user_prompt,
            target_tags: campaign.target_tags,
            created_at: campaign.created_at,
            started_at: campaign.started_at,
            completed_at: campaign.completed_at,
        }
    }
}

/// Create a campaign.
#[utoipa::path(
    post,
    path = "/api/v1/campaigns",
    request_body = CampaignBody,
    responses(
        (status = 201, description = "Created campaign", body = CampaignResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["campaigns"],
    operation_id = "createCampaign"
)]
#[post("/campaigns")]
pub async fn create_campaign(
    state: web::Data<HttpState>,
    payload: web::Json<CampaignBody>,
) -> ApiResult<HttpResponse> {
    let campaign = state.campaigns.create(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(CampaignResponse::from(campaign)))
}

/// List campaigns, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/campaigns",
    responses(
        (status = 200, description = "Campaigns", body = [CampaignResponse]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["campaigns"],
    operation_id = "listCampaigns"
)]
#[get("/campaigns")]
pub async fn list_campaigns(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CampaignResponse>>> {
    let campaigns = state.campaigns.list().await?;
    Ok(web::Json(
        campaigns.into_iter().map(CampaignResponse::from).collect(),
    ))
}
