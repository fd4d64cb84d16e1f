use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::appointment_routes;
use shared_database::Store;
use shared_models::appointment::AppointmentStatus;
use shared_models::user::Role;
use shared_utils::test_utils::{body_json, SeededUser, TestApp, TestConfig, TestUser};

fn request(method: &str, uri: &str, bearer: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

struct Fixture {
    test_app: TestApp,
    app: Router,
    doctor: SeededUser,
    patient: SeededUser,
}

async fn fixture_with(test_app: TestApp) -> Fixture {
    let doctor = test_app.seed_user(&TestUser::doctor("doc@example.com")).await;
    let patient = test_app.seed_user(&TestUser::patient("pat@example.com")).await;
    test_app.seed_doctor_profile(doctor.id(), "9AM-5PM").await;
    let app = appointment_routes(test_app.state.clone());
    Fixture { test_app, app, doctor, patient }
}

async fn fixture() -> Fixture {
    fixture_with(TestApp::new()).await
}

async fn book(f: &Fixture, as_user: &SeededUser, slot: &str, date: &str) -> (StatusCode, Value) {
    let body = json!({
        "doctor": f.doctor.id(),
        "checkupTiming": slot,
        "date": date,
        "notes": "persistent cough",
    });
    let response = f
        .app
        .clone()
        .oneshot(request("POST", "/booking", &as_user.bearer(), Some(body)))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn patient_books_pending_appointment() {
    let f = fixture().await;

    let (status, body) = book(&f, &f.patient, "9-10", "2024-01-01").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "Appointment booked successfully");
    assert_eq!(body["data"]["status"], "Pending");
    assert_eq!(body["data"]["bookedBy"], f.patient.id().to_string());
    assert_eq!(body["data"]["checkupTiming"], "9-10");
}

#[tokio::test]
async fn double_booking_same_slot_conflicts_without_new_record() {
    let f = fixture().await;
    let other = f.test_app.seed_user(&TestUser::patient("other@example.com")).await;

    let (status, _) = book(&f, &f.patient, "9-10", "2024-01-01").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = book(&f, &other, "9-10", "2024-01-01").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], false);
    assert_eq!(f.test_app.store.appointment_count().await, 1);

    // Different date or slot is fine.
    let (status, _) = book(&f, &other, "9-10", "2024-01-02").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = book(&f, &other, "10-11", "2024-01-01").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn concurrent_bookings_leave_one_appointment() {
    let f = fixture().await;
    let other = f.test_app.seed_user(&TestUser::patient("other@example.com")).await;

    let (a, b) = tokio::join!(
        book(&f, &f.patient, "11-12", "2024-03-03"),
        book(&f, &other, "11-12", "2024-03-03"),
    );

    let mut statuses = vec![a.0, b.0];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(f.test_app.store.appointment_count().await, 1);
}

#[tokio::test]
async fn role_rules_for_booking() {
    let f = fixture().await;

    let (status, body) = book(&f, &f.doctor, "9-10", "2024-01-01").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Only patients are allowed to book the appointment");

    let body = json!({
        "doctor": f.patient.id(),
        "checkupTiming": "9-10",
        "date": "2024-01-01",
        "notes": "",
    });
    let response = f
        .app
        .clone()
        .oneshot(request("POST", "/booking", &f.patient.bearer(), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn slot_must_fall_within_consultation_hours() {
    let f = fixture().await;

    let (status, _) = book(&f, &f.patient, "20-21", "2024-01-01").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = book(&f, &f.patient, "9AM", "2024-01-01").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn rejected_appointment_releases_slot() {
    let f = fixture().await;
    let (_, body) = book(&f, &f.patient, "9-10", "2024-01-01").await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = f
        .app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/{}/status", id),
            &f.doctor.bearer(),
            Some(json!({ "status": "Rejected" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "Rejected");

    let (status, _) = book(&f, &f.patient, "9-10", "2024-01-01").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn only_assigned_doctor_or_admin_changes_status() {
    let f = fixture().await;
    let (_, body) = book(&f, &f.patient, "9-10", "2024-01-01").await;
    let uri = format!("/{}/status", body["data"]["id"].as_str().unwrap());

    let response = f
        .app
        .clone()
        .oneshot(request("PATCH", &uri, &f.patient.bearer(), Some(json!({ "status": "Accepted" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = f.test_app.seed_user(&TestUser::admin("admin@example.com")).await;
    let response = f
        .app
        .clone()
        .oneshot(request("PATCH", &uri, &admin.bearer(), Some(json!({ "status": "Accepted" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn transitions_unguarded_by_default() {
    let f = fixture().await;
    let (_, body) = book(&f, &f.patient, "9-10", "2024-01-01").await;
    let uri = format!("/{}/status", body["data"]["id"].as_str().unwrap());

    for status in ["Completed", "Pending"] {
        let response = f
            .app
            .clone()
            .oneshot(request("PATCH", &uri, &f.doctor.bearer(), Some(json!({ "status": status }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn strict_mode_blocks_illegal_transition() {
    let config = TestConfig {
        strict_status_transitions: true,
        ..Default::default()
    };
    let f = fixture_with(TestApp::with_config(config.to_app_config())).await;
    let (_, body) = book(&f, &f.patient, "9-10", "2024-01-01").await;
    let uri = format!("/{}/status", body["data"]["id"].as_str().unwrap());

    let response = f
        .app
        .clone()
        .oneshot(request("PATCH", &uri, &f.doctor.bearer(), Some(json!({ "status": "Completed" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = f
        .app
        .clone()
        .oneshot(request("PATCH", &uri, &f.doctor.bearer(), Some(json!({ "status": "Accepted" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = f
        .test_app
        .store
        .list_appointments(&Default::default())
        .await
        .unwrap();
    assert_eq!(stored[0].status, AppointmentStatus::Accepted);
}

#[tokio::test]
async fn listings_are_scoped_and_paginated() {
    let f = fixture().await;
    for slot in ["9-10", "10-11", "11-12"] {
        book(&f, &f.patient, slot, "2024-01-01").await;
    }

    let response = f
        .app
        .clone()
        .oneshot(request("GET", "/mine?page=2&limit=2", &f.patient.bearer(), None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["totalPages"], 2);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    let response = f
        .app
        .clone()
        .oneshot(request("GET", "/mine", &f.doctor.bearer(), None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["total"], 3);

    let stranger = f.test_app.seed_user(&TestUser::patient("s@example.com")).await;
    let response = f
        .app
        .clone()
        .oneshot(request("GET", "/mine", &stranger.bearer(), None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["total"], 0);
}

#[tokio::test]
async fn get_all_doctors_lists_doctor_users() {
    let f = fixture().await;
    f.test_app.seed_user(&TestUser::doctor("doc2@example.com")).await;

    let response = f
        .app
        .clone()
        .oneshot(request("GET", "/get-all-doctors", &f.patient.bearer(), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|d| d["role"] == Role::Doctor.to_string()));
    assert!(items.iter().all(|d| d["isDoctor"] == true));
    assert!(items.iter().any(|d| d["profile"]["consultationTiming"] == "9AM-5PM"));
}
