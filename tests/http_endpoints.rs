//! End-to-end HTTP surface checks against the fixture-backed application.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use crm_backend::inbound::http::actions::{list_actions, list_contact_actions, log_action};
use crm_backend::inbound::http::campaigns::{create_campaign, list_campaigns};
use crm_backend::inbound::http::contacts::{
    archive_contact, bulk_upsert_contacts, get_contact, list_contacts, update_contact,
    upsert_contact,
};
use crm_backend::inbound::http::overview::get_overview;
use crm_backend::inbound::http::state::{HttpState, HttpStatePorts};

fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(HttpStatePorts::default());
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
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
            .service(get_overview),
    )
}

#[actix_web::test]
async fn contact_upsert_round_trips_the_payload() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/contacts")
            .set_json(json!({
                "name": "Grace Hopper",
                "email": "grace@example.com",
                "tags": [" Compilers", "navy", "compilers"],
                "relationshipStage": "contacted"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("name").and_then(Value::as_str),
        Some("Grace Hopper")
    );
    assert_eq!(body.get("tags"), Some(&json!(["compilers", "navy"])));
    assert_eq!(
        body.get("relationshipStage").and_then(Value::as_str),
        Some("contacted")
    );
    assert_eq!(body.get("isArchived").and_then(Value::as_bool), Some(false));
    assert!(body.get("id").and_then(Value::as_str).is_some());
}

#[actix_web::test]
async fn contact_listing_exposes_total_and_items() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/contacts?limit=10&tags=compilers")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(response).await;
    assert!(body.get("total").is_some());
    assert!(body.get("items").and_then(Value::as_array).is_some());
}

#[actix_web::test]
async fn unknown_contact_yields_error_envelope() {
    let app = actix_test::init_service(test_app()).await;

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
    assert!(body.get("message").and_then(Value::as_str).is_some());
}

#[actix_web::test]
async fn contact_update_is_reachable_via_put() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/contacts/{}", Uuid::new_v4()))
            .set_json(json!({ "company": "Acme" }))
            .to_request(),
    )
    .await;

    // The fixture command knows no contacts; the route itself must resolve.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("not_found"));
}

#[actix_web::test]
async fn action_logging_defaults_status_to_completed() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/actions")
            .set_json(json!({
                "contactId": Uuid::new_v4(),
                "actionType": "connection_request_sent"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("status").and_then(Value::as_str),
        Some("completed")
    );
    assert_eq!(body.get("details"), Some(&json!({})));
}

#[actix_web::test]
async fn campaign_creation_returns_created_status() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/campaigns")
            .set_json(json!({
                "userPrompt": "reach dormant customers",
                "targetTags": ["Dormant"]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("targetTags"), Some(&json!(["dormant"])));
}

#[actix_web::test]
async fn overview_exposes_all_sections() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/stats/overview")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(response).await;
    for field in [
        "totalContacts",
        "activeCampaigns",
        "stageCounts",
        "tagCounts",
        "recentActions",
        "dailyActionCounts",
    ] {
        assert!(body.get(field).is_some(), "overview should expose {field}");
    }
}

#[actix_web::test]
async fn bulk_upsert_reports_multi_status() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/contacts/bulk")
            .set_json(json!([
                { "name": "Ada Lovelace" },
                { "name": "" }
            ]))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::MULTI_STATUS);

    let body: Value = actix_test::read_body_json(response).await;
    let outcomes = body.as_array().expect("outcome array");
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].get("index").and_then(Value::as_u64), Some(0));
    assert!(outcomes[1].get("error").is_some());
}
