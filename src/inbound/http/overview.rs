//! Dashboard overview API handler.
//!
//! ```text
//! GET /api/v1/stats/overview   Point-in-time dashboard snapshot
//! ```

use std::collections::BTreeMap;

use actix_web::{get, web};
use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{CrmOverview, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::actions::ActionResponse;
use crate::inbound::http::state::HttpState;

/// One daily activity bucket.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyCountResponse {
    pub day: NaiveDate,
    pub count: i64,
}

/// Dashboard snapshot returned by the overview endpoint.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub total_contacts: i64,
    pub active_campaigns: i64,
    /// Non-archived contacts per lifecycle stage, keyed by stage name.
    pub stage_counts: BTreeMap<String, i64>,
    pub tag_counts: BTreeMap<String, i64>,
    pub recent_actions: Vec<ActionResponse>,
    pub daily_action_counts: Vec<DailyCountResponse>,
}

impl From<CrmOverview> for OverviewResponse {
    fn from(overview: CrmOverview) -> Self {
        Self {
            total_contacts: overview.total_contacts,
            active_campaigns: overview.active_campaigns,
            stage_counts: overview
                .stage_counts
                .into_iter()
                .map(|(stage, count)| (stage.as_str().to_owned(), count))
                .collect(),
            tag_counts: overview.tag_counts,
            recent_actions: overview
                .recent_actions
                .into_iter()
                .map(ActionResponse::from)
                .collect(),
            daily_action_counts: overview
                .daily_action_counts
                .into_iter()
                .map(|bucket| DailyCountResponse {
                    day: bucket.day,
                    count: bucket.count,
                })
                .collect(),
        }
    }
}

/// Recompute the dashboard snapshot from current store state.
#[utoipa::path(
    get,
    path = "/api/v1/stats/overview",
    responses(
        (status = 200, description = "Dashboard snapshot", body = OverviewResponse),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["stats"],
    operation_id = "getOverview"
)]
#[get("/stats/overview")]
pub async fn get_overview(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<OverviewResponse>> {
    let overview = state.overview.overview().await?;
    Ok(web::Json(overview.into()))
}
