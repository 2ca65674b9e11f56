//! End-to-end API tests covering the register/login flow and
//! owner-scoped appointment CRUD.

use apptrack_web::{create_app, AppState, WebConfig};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app() -> Router {
    let mut config = WebConfig::default();
    config.dev_mode = true;
    config.database_url = Some("sqlite::memory:".to_string());
    config.auth.jwt_secret = Some("integration-test-secret".to_string());
    config.auth.argon2_memory_kib = 1024;
    config.auth.argon2_iterations = 1;

    let state = AppState::new(config).await.unwrap();
    create_app(state)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user and return the issued token
async fn register(app: &Router, name: &str, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/users",
            None,
            Some(&json!({ "name": name, "email": email, "password": "secret1" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

/// Create an appointment and return its id
async fn create_appointment(app: &Router, token: &str, title: &str, start: &str) -> String {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/appointments",
            Some(token),
            Some(&json!({
                "title": title,
                "description": "integration test",
                "start_time": start,
                "end_time": "2026-09-01T11:00:00Z",
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_then_fetch_identity() {
    let app = test_app().await;

    // Register Ann and use the returned token against /me
    let token = register(&app, "Ann", "ann@x.com").await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/users/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Ann");
    assert_eq!(body["email"], "ann@x.com");

    // Omitting the header short-circuits with 401
    let response = app
        .oneshot(request("GET", "/api/users/me", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_issues_a_working_token() {
    let app = test_app().await;
    register(&app, "Ann", "ann@x.com").await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/users/login",
            None,
            Some(&json!({ "email": "ann@x.com", "password": "secret1" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(request("GET", "/api/users/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn appointment_crud_round_trip() {
    let app = test_app().await;
    let token = register(&app, "Ann", "ann@x.com").await;

    let id = create_appointment(&app, &token, "Dentist", "2026-09-01T10:00:00Z").await;

    // Read it back
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/appointments/{id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Dentist");
    assert_eq!(body["status"], "scheduled");
    assert_eq!(body["reminder"], true);

    // Partial update: only the status changes
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/appointments/{id}"),
            Some(&token),
            Some(&json!({ "status": "completed" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["title"], "Dentist");

    // Delete returns the removed id
    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/appointments/{id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], id.as_str());

    // Gone afterwards
    let response = app
        .oneshot(request(
            "GET",
            &format!("/api/appointments/{id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn appointment_creation_requires_all_fields() {
    let app = test_app().await;
    let token = register(&app, "Ann", "ann@x.com").await;

    let response = app
        .oneshot(request(
            "POST",
            "/api/appointments",
            Some(&token),
            Some(&json!({ "title": "No description" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Please add all required fields"
    );
}

#[tokio::test]
async fn ownership_is_enforced_on_id_scoped_routes() {
    let app = test_app().await;
    let ann = register(&app, "Ann", "ann@x.com").await;
    let bob = register(&app, "Bob", "bob@x.com").await;

    let ann_appt = create_appointment(&app, &ann, "Ann's", "2026-09-01T10:00:00Z").await;
    let bob_appt = create_appointment(&app, &bob, "Bob's", "2026-09-02T10:00:00Z").await;

    // Bob cannot read, update, or delete Ann's appointment
    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({ "title": "hijacked" }))),
        ("DELETE", None),
    ] {
        let response = app
            .clone()
            .oneshot(request(
                method,
                &format!("/api/appointments/{ann_appt}"),
                Some(&bob),
                body.as_ref(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{method} should be forbidden");
    }

    // An unknown id is NotFound, not Forbidden
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/appointments/does-not-exist",
            Some(&bob),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Each owner still sees only their own appointment
    let response = app
        .clone()
        .oneshot(request("GET", "/api/appointments", Some(&ann), None))
        .await
        .unwrap();
    let body = body_json(response).await;
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], ann_appt.as_str());

    // And Bob's own appointment remains reachable to him
    let response = app
        .oneshot(request(
            "GET",
            &format!("/api/appointments/{bob_appt}"),
            Some(&bob),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn listing_filters_by_start_time_window() {
    let app = test_app().await;
    let token = register(&app, "Ann", "ann@x.com").await;

    let in_window = create_appointment(&app, &token, "Inside", "2026-09-01T10:00:00Z").await;
    create_appointment(&app, &token, "Outside", "2026-12-24T10:00:00Z").await;

    let response = app
        .oneshot(request(
            "GET",
            "/api/appointments?from=2026-08-31T00:00:00Z&to=2026-09-02T00:00:00Z",
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], in_window.as_str());
}
