use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use shared_utils::test_utils::{body_json, TestApp, TestConfig};
use telemed_api::create_router;

fn post_json(uri: &str, bearer: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, bearer);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, bearer);
    }
    builder.body(Body::empty()).unwrap()
}

async fn register_and_login(app: &Router, email: &str, role: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            None,
            json!({ "email": email, "password": "secret123", "fullName": "Someone", "role": role }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({ "email": email, "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    format!("Bearer {}", body["data"]["token"].as_str().unwrap())
}

#[tokio::test]
async fn welcome_and_unknown_routes() {
    let app = create_router(TestApp::new().state);

    let response = app.clone().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Welcome to Telemedicine!");

    let response = app.oneshot(get("/nowhere", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "status": false, "message": "Route Not Found!" })
    );
}

#[tokio::test]
async fn routes_live_under_the_configured_prefix() {
    let mut config = TestConfig::default().to_app_config();
    config.api_prefix = "/api".to_string();
    let app = create_router(TestApp::with_config(config).state);

    let response = app.clone().oneshot(get("/api/doctor/types", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/doctor/types", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_flow_across_cells() {
    let app = create_router(TestApp::new().state);

    let doctor = register_and_login(&app, "doc@example.com", "DOCTOR").await;
    let patient = register_and_login(&app, "pat@example.com", "PATIENT").await;

    let body = body_json(app.clone().oneshot(get("/profile/get-profile", Some(&doctor))).await.unwrap()).await;
    let doctor_id = body["data"]["user"]["id"].as_str().unwrap().to_string();
    assert!(body["data"]["profile"].is_null());

    let booking = json!({
        "doctor": doctor_id,
        "checkupTiming": "9-10",
        "date": "2024-01-01",
        "notes": "first visit"
    });

    let response = app
        .clone()
        .oneshot(post_json("/appointment/booking", Some(&patient), booking.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(post_json("/appointment/booking", Some(&patient), booking))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(app.clone().oneshot(get("/payment/get-bookings", Some(&patient))).await.unwrap()).await;
    assert_eq!(body["data"]["bookingDetails"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(post_json("/auth/logout", Some(&patient), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/appointment/mine", Some(&patient))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn uploaded_images_are_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("avatar.png"), [1u8, 2, 3]).unwrap();

    let config = TestConfig {
        upload_dir: dir.path().display().to_string(),
        ..TestConfig::default()
    };
    let app = create_router(TestApp::with_config(config.to_app_config()).state);

    let response = app.oneshot(get("/uploads/avatar.png", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
