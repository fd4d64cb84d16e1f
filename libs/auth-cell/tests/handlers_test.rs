use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_cell::auth_routes;
use shared_database::Store;
use shared_utils::test_utils::{body_json, JwtTestUtils, TestApp, TestUser};

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_post(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn register(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_post(
            "/register",
            json!({ "email": email, "password": password, "fullName": "Jane Doe" }),
        ))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_post("/login", json!({ "email": email, "password": password })))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn register_then_login_resolves_same_user() {
    let test_app = TestApp::new();
    let app = auth_routes(test_app.state.clone());

    let (status, body) = register(&app, "Jane@Example.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    assert_eq!(body["data"]["email"], "jane@example.com");

    let (status, body) = login(&app, "jane@example.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let response = app.clone().oneshot(authed_post("/validate", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let stored = test_app
        .state
        .store
        .find_user_by_email("jane@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(body["data"]["valid"], true);
    assert_eq!(body["data"]["userId"], stored.id.to_string());
    assert_eq!(body["data"]["role"], "PATIENT");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = auth_routes(TestApp::new().state);

    register(&app, "dup@example.com", "secret1").await;
    let (status, body) = register(&app, "DUP@example.com", "secret1").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "You are already registered! Please login");
}

#[tokio::test]
async fn login_failures_use_bad_request() {
    let app = auth_routes(TestApp::new().state);

    let (status, body) = login(&app, "nobody@example.com", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You are not registered, Please register!");

    register(&app, "jane@example.com", "secret1").await;
    let (status, body) = login(&app, "jane@example.com", "wrong-password").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn invalid_registration_payload_is_unprocessable() {
    let app = auth_routes(TestApp::new().state);

    let (status, body) = register(&app, "not-an-email", "secret1").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], false);

    let response = app
        .clone()
        .oneshot(json_post("/register", json!({ "email": "a@b.co" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn legacy_is_doctor_flag_registers_doctor() {
    let test_app = TestApp::new();
    let app = auth_routes(test_app.state.clone());

    let response = app
        .oneshot(json_post(
            "/register",
            json!({ "email": "doc@example.com", "password": "secret1", "fullName": "Dr. Doe", "isDoctor": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let user = test_app
        .state
        .store
        .find_user_by_email("doc@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.role, shared_models::user::Role::Doctor);
}

#[tokio::test]
async fn logout_blacklists_token() {
    let test_app = TestApp::new();
    let app = auth_routes(test_app.state.clone());
    let seeded = test_app.seed_user(&TestUser::patient("p@example.com")).await;

    let response = app.clone().oneshot(authed_post("/logout", &seeded.token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(authed_post("/logout", &seeded.token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Token is blacklisted");

    let response = app.oneshot(authed_post("/validate", &seeded.token)).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["valid"], false);
}

#[tokio::test]
async fn protected_route_rejects_bad_tokens() {
    let test_app = TestApp::new();
    let app = auth_routes(test_app.state.clone());
    let seeded = test_app.seed_user(&TestUser::patient("p@example.com")).await;
    let secret = test_app.config().jwt_secret.clone();

    let tokens = [
        JwtTestUtils::create_expired_token(seeded.id(), &seeded.user.email, &secret),
        JwtTestUtils::create_invalid_signature_token(seeded.id(), &seeded.user.email),
        JwtTestUtils::create_malformed_token(),
    ];

    for token in tokens {
        let response = app.clone().oneshot(authed_post("/logout", &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app
        .oneshot(Request::builder().method("POST").uri("/logout").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_deleted_user_is_rejected() {
    let test_app = TestApp::new();
    let app = auth_routes(test_app.state.clone());
    let token = JwtTestUtils::create_test_token(
        uuid::Uuid::new_v4(),
        "ghost@example.com",
        &test_app.config().jwt_secret,
        None,
    );

    let response = app.oneshot(authed_post("/logout", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "User not found");
}
