// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::*;
use axum::{
    body::Body,
    http::{Request as HttpRequest, StatusCode as HttpStatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN: &str = "admin-1";

/// Helper to create test app state with in-memory persistence.
fn create_test_app_state(lock_timeout: Duration) -> AppState {
    let persistence: SqlitePersistence =
        SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        auto_match_threshold: DEFAULT_AUTO_MATCH_THRESHOLD,
        lock_timeout,
    }
}

fn create_test_app() -> Router {
    build_router(create_test_app_state(Duration::from_secs(5)))
}

/// Wraps a payload in the actor and cause envelope.
fn command(actor_id: &str, actor_role: &str, body: Value) -> Value {
    let mut envelope: Value = json!({
        "actor_id": actor_id,
        "actor_role": actor_role,
        "cause_id": "test-cause",
        "cause_description": "Router test",
    });
    if let (Some(target), Value::Object(fields)) = (envelope.as_object_mut(), body) {
        target.extend(fields);
    }
    envelope
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (HttpStatusCode, Value) {
    let request: HttpRequest<Body> = match body {
        Some(body) => HttpRequest::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => HttpRequest::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: HttpStatusCode = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(app: &Router, name: &str, role: &str, location: Option<Value>) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/participants",
        Some(command(
            ADMIN,
            "admin",
            json!({ "name": name, "role": role, "address": null, "location": location }),
        )),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK, "{body}");
    body["participant"]["participant_id"].as_i64().unwrap()
}

async fn donate(app: &Router, donor_id: i64, item_type: &str, quantity: u32) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/donations",
        Some(command(
            ADMIN,
            "admin",
            json!({
                "donor_id": donor_id,
                "items": [{
                    "item_name": format!("{item_type} box"),
                    "item_type": item_type,
                    "quantity": quantity,
                    "condition": "good",
                }],
            }),
        )),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK, "{body}");
    body
}

async fn ask(
    app: &Router,
    recipient_id: i64,
    item_type: &str,
    quantity: u32,
    urgency: &str,
) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/requests",
        Some(command(
            ADMIN,
            "admin",
            json!({
                "recipient_id": recipient_id,
                "item_type": item_type,
                "quantity": quantity,
                "urgency": urgency,
            }),
        )),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK, "{body}");
    body["request"]["request_id"].as_i64().unwrap()
}

fn admin_query() -> String {
    format!("actor_id={ADMIN}&actor_role=admin")
}

#[tokio::test]
async fn test_match_approval_flow() {
    let app: Router = create_test_app();
    let donor_location: Value = json!({ "lat": 0.0, "lng": 0.0 });
    let donor_id: i64 = register(&app, "Dana Donor", "donor", Some(donor_location)).await;
    let recipient_id: i64 = register(&app, "Rey Recipient", "recipient", None).await;

    let request_id: i64 = ask(&app, recipient_id, "food", 5, "critical").await;
    let created: Value = donate(&app, donor_id, "food", 10).await;
    let donation_id: i64 = created["donation"]["donation_id"].as_i64().unwrap();
    assert_eq!(created["potential_matches"].as_array().unwrap().len(), 1);
    assert!(
        created["donation"]["tracking_id"]
            .as_str()
            .unwrap()
            .starts_with("SDMS-")
    );

    let (status, matches) = send(
        &app,
        "GET",
        &format!("/matching/donation/{donation_id}?{}", admin_query()),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(matches[0]["request"]["request_id"], request_id);

    let approve: Value = command(
        ADMIN,
        "admin",
        json!({ "donation_id": donation_id, "request_id": request_id }),
    );
    let (status, outcome) = send(&app, "POST", "/matching/approve", Some(approve.clone())).await;
    assert_eq!(status, HttpStatusCode::OK, "{outcome}");
    assert_eq!(outcome["donation"]["status"], "approved");
    assert_eq!(outcome["request"]["status"], "matched");
    assert_eq!(outcome["notification_ids"].as_array().unwrap().len(), 2);
    assert!(outcome["logistics_id"].as_i64().is_some());
    assert!(outcome["side_effects"]["failures"].as_array().unwrap().is_empty());

    let (status, _) = send(&app, "POST", "/matching/approve", Some(approve)).await;
    assert_eq!(status, HttpStatusCode::CONFLICT);
}

#[tokio::test]
async fn test_approve_match_as_donor_is_forbidden() {
    let app: Router = create_test_app();
    let donor_id: i64 = register(&app, "Dana Donor", "donor", None).await;
    let recipient_id: i64 = register(&app, "Rey Recipient", "recipient", None).await;
    let request_id: i64 = ask(&app, recipient_id, "food", 5, "high").await;
    let donation_id: i64 = donate(&app, donor_id, "food", 5).await["donation"]["donation_id"]
        .as_i64()
        .unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/matching/approve",
        Some(command(
            &donor_id.to_string(),
            "donor",
            json!({ "donation_id": donation_id, "request_id": request_id }),
        )),
    )
    .await;

    assert_eq!(status, HttpStatusCode::FORBIDDEN);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_unknown_role_is_unauthenticated() {
    let app: Router = create_test_app();

    let (status, body) = send(
        &app,
        "GET",
        "/donations/pending?actor_id=someone&actor_role=superuser",
        None,
    )
    .await;

    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_missing_donation_returns_not_found() {
    let app: Router = create_test_app();

    let (status, _) = send(
        &app,
        "GET",
        &format!("/matching/donation/999?{}", admin_query()),
        None,
    )
    .await;

    assert_eq!(status, HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_urgency_is_bad_request() {
    let app: Router = create_test_app();
    let recipient_id: i64 = register(&app, "Rey Recipient", "recipient", None).await;

    let (status, body) = send(
        &app,
        "POST",
        "/requests",
        Some(command(
            ADMIN,
            "admin",
            json!({
                "recipient_id": recipient_id,
                "item_type": "food",
                "quantity": 5,
                "urgency": "whenever",
            }),
        )),
    )
    .await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("urgency"));
}

#[tokio::test]
async fn test_incompatible_match_is_unprocessable() {
    let app: Router = create_test_app();
    let donor_id: i64 = register(&app, "Dana Donor", "donor", None).await;
    let recipient_id: i64 = register(&app, "Rey Recipient", "recipient", None).await;
    let request_id: i64 = ask(&app, recipient_id, "books", 5, "high").await;
    let donation_id: i64 = donate(&app, donor_id, "water", 5).await["donation"]["donation_id"]
        .as_i64()
        .unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/matching/approve",
        Some(command(
            ADMIN,
            "admin",
            json!({ "donation_id": donation_id, "request_id": request_id }),
        )),
    )
    .await;

    assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_auto_match_uses_supplied_threshold() {
    let app: Router = create_test_app();
    let donor_id: i64 = register(&app, "Dana Donor", "donor", None).await;
    let recipient_id: i64 = register(&app, "Rey Recipient", "recipient", None).await;
    let request_id: i64 = ask(&app, recipient_id, "food", 10, "critical").await;
    let donation_id: i64 = donate(&app, donor_id, "food", 10).await["donation"]["donation_id"]
        .as_i64()
        .unwrap();

    // A fresh critical request scores 44, below the default of 80.
    let (status, report) = send(
        &app,
        "POST",
        "/matching/auto-match",
        Some(command(ADMIN, "admin", json!({}))),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(report["threshold"], DEFAULT_AUTO_MATCH_THRESHOLD);
    assert!(report["matches"].as_array().unwrap().is_empty());

    let (status, report) = send(
        &app,
        "POST",
        "/matching/auto-match",
        Some(command(ADMIN, "admin", json!({ "threshold": 40 }))),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK, "{report}");
    let matches: &Vec<Value> = report["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["donation_id"], donation_id);
    assert_eq!(matches[0]["request_id"], request_id);
    assert_eq!(matches[0]["score"], 44);
}

#[tokio::test]
async fn test_notifications_and_tracking_after_match() {
    let app: Router = create_test_app();
    let donor_id: i64 = register(&app, "Dana Donor", "donor", None).await;
    let recipient_id: i64 = register(&app, "Rey Recipient", "recipient", None).await;
    let request_id: i64 = ask(&app, recipient_id, "food", 5, "high").await;
    let created: Value = donate(&app, donor_id, "food", 5).await;
    let donation_id: i64 = created["donation"]["donation_id"].as_i64().unwrap();
    let tracking_id: &str = created["donation"]["tracking_id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/matching/approve",
        Some(command(
            ADMIN,
            "admin",
            json!({ "donation_id": donation_id, "request_id": request_id }),
        )),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);

    let (status, tracked) = send(&app, "GET", &format!("/tracking/{tracking_id}"), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(tracked["donation_id"], donation_id);

    let donor_query: String =
        format!("actor_id={donor_id}&actor_role=donor&participant_id={donor_id}");
    let (status, listed) = send(
        &app,
        "GET",
        &format!("/notifications?{donor_query}"),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK, "{listed}");
    assert_eq!(listed["unread_count"], 1);
    let notification_id: i64 = listed["notifications"][0]["notification_id"]
        .as_i64()
        .unwrap();

    let (status, read) = send(
        &app,
        "POST",
        &format!("/notifications/{notification_id}/read"),
        Some(json!({ "actor_id": donor_id.to_string(), "actor_role": "donor" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(read["read"], true);

    let (status, count) = send(
        &app,
        "GET",
        &format!("/notifications/count?{donor_query}"),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(count["unread_count"], 0);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/notifications?actor_id={recipient_id}&actor_role=recipient&participant_id={donor_id}"),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logistics_status_advances_donation() {
    let app: Router = create_test_app();
    let donor_id: i64 = register(&app, "Dana Donor", "donor", None).await;
    let recipient_id: i64 = register(&app, "Rey Recipient", "recipient", None).await;
    let request_id: i64 = ask(&app, recipient_id, "food", 5, "high").await;
    let donation_id: i64 = donate(&app, donor_id, "food", 5).await["donation"]["donation_id"]
        .as_i64()
        .unwrap();
    send(
        &app,
        "POST",
        "/matching/approve",
        Some(command(
            ADMIN,
            "admin",
            json!({ "donation_id": donation_id, "request_id": request_id }),
        )),
    )
    .await;

    let (status, logistics) = send(
        &app,
        "GET",
        &format!("/logistics/donation/{donation_id}?actor_id={donor_id}&actor_role=donor"),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK, "{logistics}");
    assert_eq!(logistics["status"], "scheduled");
    let logistics_id: i64 = logistics["logistics_id"].as_i64().unwrap();

    let uri: String = format!("/logistics/{logistics_id}/status");
    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(command(ADMIN, "admin", json!({ "status": "picked-up" }))),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);

    let (status, moved) = send(
        &app,
        "POST",
        &uri,
        Some(command(ADMIN, "admin", json!({ "status": "in-transit" }))),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK, "{moved}");
    assert_eq!(moved["donation"]["status"], "in-transit");

    // Skipping straight back to scheduled is not a forward step.
    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(command(ADMIN, "admin", json!({ "status": "scheduled" }))),
    )
    .await;
    assert_eq!(status, HttpStatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reject_and_cancel_endpoints() {
    let app: Router = create_test_app();
    let donor_id: i64 = register(&app, "Dana Donor", "donor", None).await;
    let recipient_id: i64 = register(&app, "Rey Recipient", "recipient", None).await;
    let request_id: i64 = ask(&app, recipient_id, "food", 5, "low").await;
    let donation_id: i64 = donate(&app, donor_id, "food", 5).await["donation"]["donation_id"]
        .as_i64()
        .unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/donations/{donation_id}/reject"),
        Some(command(ADMIN, "admin", json!({ "reason": "   " }))),
    )
    .await;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);

    let (status, rejected) = send(
        &app,
        "POST",
        &format!("/donations/{donation_id}/reject"),
        Some(command(ADMIN, "admin", json!({ "reason": "Expired goods" }))),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(rejected["donation"]["status"], "rejected");
    let event_id: i64 = rejected["audit_event_id"].as_i64().unwrap();

    let (status, cancelled) = send(
        &app,
        "POST",
        &format!("/requests/{request_id}/cancel"),
        Some(command(&recipient_id.to_string(), "recipient", json!({}))),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK, "{cancelled}");
    assert_eq!(cancelled["request"]["status"], "cancelled");

    let (status, available) = send(&app, "GET", "/requests/available", None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert!(available.as_array().unwrap().is_empty());

    let (status, event) = send(
        &app,
        "GET",
        &format!("/audit/event/{event_id}?{}", admin_query()),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(event["donation_id"], donation_id);
}

#[tokio::test]
async fn test_lock_timeout_returns_service_unavailable() {
    let app_state: AppState = create_test_app_state(Duration::from_millis(20));
    let app: Router = build_router(app_state.clone());

    let guard = app_state.persistence.lock().await;
    let (status, body) = send(&app, "GET", "/requests/available", None).await;
    drop(guard);

    assert_eq!(status, HttpStatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], true);

    let (status, _) = send(&app, "GET", "/requests/available", None).await;
    assert_eq!(status, HttpStatusCode::OK);
}
