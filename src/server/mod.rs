//! Server construction and wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{ActionService, CampaignService, ContactService, OverviewService};
use crate::inbound::http::actions::{list_actions, list_contact_actions, log_action};
use crate::inbound::http::campaigns::{create_campaign, list_campaigns};
use crate::inbound::http::contacts::{
    archive_contact, bulk_upsert_contacts, get_contact, list_contacts, update_contact,
    upsert_contact,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::overview::get_overview;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::persistence::{
    DieselActionRepository, DieselCampaignRepository, DieselContactRepository,
};

/// Build the HTTP state from configuration.
///
/// Uses the database-backed services when a pool is configured, otherwise the
/// in-memory fixtures.
fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => {
            let contact_repo = Arc::new(DieselContactRepository::new(pool.clone()));
            let action_repo = Arc::new(DieselActionRepository::new(pool.clone()));
            let campaign_repo = Arc::new(DieselCampaignRepository::new(pool.clone()));

            let contact_service = ContactService::new(contact_repo.clone());
            let overview_service = OverviewService::new(
                contact_repo,
                action_repo.clone(),
                campaign_repo.clone(),
            );

            HttpState::new(HttpStatePorts {
                contacts_command: Arc::new(contact_service.clone()),
                contacts_query: Arc::new(contact_service),
                action_log: Arc::new(ActionService::new(action_repo)),
                campaigns: Arc::new(CampaignService::new(campaign_repo)),
                overview: Arc::new(overview_service),
            })
        }
        None => HttpState::new(HttpStatePorts::default()),
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(list_contacts)
        .service(upsert_contact)
        .service(bulk_upsert_contacts)
        .service(get_contact)
        .service(update_contact)
        .service(archive_contact)
        .service(log_action)
        .service(list_actions)
        .service(list_contact_actions)
        .service(create_campaign)
        .service(list_campaigns)
        .service(get_overview);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
