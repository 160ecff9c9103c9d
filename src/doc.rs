//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for the
//! REST API: all HTTP endpoints from the inbound layer plus the shared schema
//! components. The generated specification backs Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{ActionStatus, ActionType, Error, ErrorCode, RelationshipStage};
use crate::inbound::http::actions::{ActionBody, ActionResponse};
use crate::inbound::http::campaigns::{CampaignBody, CampaignResponse};
use crate::inbound::http::contacts::{
    BulkContactOutcome, ContactBody, ContactListResponse, ContactResponse, ContactUpdateBody,
};
use crate::inbound::http::overview::{DailyCountResponse, OverviewResponse};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CRM backend API",
        description = "HTTP interface for contact reconciliation, the action \
                       log, campaigns, and the dashboard overview."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::contacts::list_contacts,
        crate::inbound::http::contacts::upsert_contact,
        crate::inbound::http::contacts::bulk_upsert_contacts,
        crate::inbound::http::contacts::get_contact,
        crate::inbound::http::contacts::update_contact,
        crate::inbound::http::contacts::archive_contact,
        crate::inbound::http::actions::log_action,
        crate::inbound::http::actions::list_actions,
        crate::inbound::http::actions::list_contact_actions,
        crate::inbound::http::campaigns::create_campaign,
        crate::inbound::http::campaigns::list_campaigns,
        crate::inbound::http::overview::get_overview,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RelationshipStage,
        ActionType,
        ActionStatus,
        ContactBody,
        ContactUpdateBody,
        ContactResponse,
        ContactListResponse,
        BulkContactOutcome,
        ActionBody,
        ActionResponse,
        CampaignBody,
        CampaignResponse,
        OverviewResponse,
        DailyCountResponse,
    )),
    tags(
        (name = "contacts", description = "Contact book and reconciliation"),
        (name = "actions", description = "Append-only interaction log"),
        (name = "campaigns", description = "Outreach campaigns"),
        (name = "stats", description = "Dashboard aggregation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
