use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use assert_matches::assert_matches;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use prescription_cell::prescription_routes;
use prescription_cell::services::prescription::PrescriptionService;
use prescription_cell::AddPrescriptionRequest;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::test_utils::{body_json, TestApp, TestUser};

fn add(bearer: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/add-prescription")
        .header(header::AUTHORIZATION, bearer)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn list(bearer: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/get-prescription")
        .header(header::AUTHORIZATION, bearer)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn doctor_adds_prescription_and_patient_reads_it() {
    let test_app = TestApp::new();
    let doctor = test_app.seed_user(&TestUser::doctor("doc@example.com")).await;
    let patient = test_app.seed_user(&TestUser::patient("pat@example.com")).await;
    let app = prescription_routes(test_app.state.clone());

    let response = app
        .clone()
        .oneshot(add(
            &doctor.bearer(),
            json!({
                "patientId": patient.id().to_string(),
                "patientName": "Pat",
                "age": 31,
                "symptoms": ["cough", "fever"],
                "diagnosis": "Flu",
                "medications": ["Paracetamol 500mg"],
                "date": "2024-01-02"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Prescription added successfully");
    assert_eq!(body["data"]["doctorId"], doctor.id().to_string());
    assert_eq!(body["data"]["date"], "2024-01-02");

    let body = body_json(app.oneshot(list(&patient.bearer())).await.unwrap()).await;
    let prescriptions = body["data"].as_array().unwrap();
    assert_eq!(prescriptions.len(), 1);
    assert_eq!(prescriptions[0]["diagnosis"], "Flu");
    assert_eq!(prescriptions[0]["symptoms"], json!(["cough", "fever"]));
}

#[tokio::test]
async fn patient_name_defaults_to_registered_name() {
    let test_app = TestApp::new();
    let doctor = test_app.seed_user(&TestUser::doctor("doc@example.com")).await;
    let patient = test_app.seed_user(&TestUser::patient("pat@example.com")).await;

    let response = prescription_routes(test_app.state.clone())
        .oneshot(add(&doctor.bearer(), json!({ "patientId": patient.id().to_string() })))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["data"]["patientName"], patient.user.full_name.as_str());
}

#[tokio::test]
async fn patients_cannot_prescribe() {
    let test_app = TestApp::new();
    let patient = test_app.seed_user(&TestUser::patient("pat@example.com")).await;

    let response = prescription_routes(test_app.state.clone())
        .oneshot(add(&patient.bearer(), json!({ "patientId": patient.id().to_string() })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_patient_or_doctor_is_not_found() {
    let test_app = TestApp::new();
    let admin = test_app.seed_user(&TestUser::admin("admin@example.com")).await;
    let doctor = test_app.seed_user(&TestUser::doctor("doc@example.com")).await;
    let patient = test_app.seed_user(&TestUser::patient("pat@example.com")).await;
    let app = prescription_routes(test_app.state.clone());

    let response = app
        .clone()
        .oneshot(add(&doctor.bearer(), json!({ "patientId": Uuid::new_v4().to_string() })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Patient not found");

    // An admin without doctorId is not a doctor.
    let response = app
        .clone()
        .oneshot(add(&admin.bearer(), json!({ "patientId": patient.id().to_string() })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Doctor not found");

    let response = app
        .oneshot(add(
            &admin.bearer(),
            json!({ "patientId": patient.id().to_string(), "doctorId": doctor.id().to_string() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn doctors_cannot_sign_for_colleagues() {
    let test_app = TestApp::new();
    let doctor = test_app.seed_user(&TestUser::doctor("doc@example.com")).await;
    let colleague = test_app.seed_user(&TestUser::doctor("other@example.com")).await;
    let patient = test_app.seed_user(&TestUser::patient("pat@example.com")).await;

    let response = prescription_routes(test_app.state.clone())
        .oneshot(add(
            &doctor.bearer(),
            json!({ "patientId": patient.id().to_string(), "doctorId": colleague.id().to_string() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_ids_are_validation_errors() {
    let test_app = TestApp::new();
    let doctor = test_app.seed_user(&TestUser::doctor("doc@example.com")).await;

    let response = prescription_routes(test_app.state.clone())
        .oneshot(add(&doctor.bearer(), json!({ "patientId": "abc" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn service_reports_missing_parties_and_foreign_prescribers() {
    let test_app = TestApp::new();
    let doctor = test_app.seed_user(&TestUser::doctor("doc@example.com")).await;
    let colleague = test_app.seed_user(&TestUser::doctor("other@example.com")).await;
    let patient = test_app.seed_user(&TestUser::patient("pat@example.com")).await;
    let service = PrescriptionService::new(test_app.state.store.clone());
    let author = AuthUser::from(&doctor.user);

    let request = |body: serde_json::Value| -> AddPrescriptionRequest { serde_json::from_value(body).unwrap() };

    assert_matches!(
        service
            .add_prescription(&author, request(json!({ "patientId": Uuid::new_v4().to_string() })))
            .await,
        Err(AppError::NotFound(message)) if message == "Patient not found"
    );

    assert_matches!(
        service
            .add_prescription(
                &author,
                request(json!({ "patientId": patient.id().to_string(), "doctorId": colleague.id().to_string() })),
            )
            .await,
        Err(AppError::Forbidden(_))
    );

    // A patient id in the doctor slot is not a doctor.
    let admin = test_app.seed_user(&TestUser::admin("admin@example.com")).await;
    assert_matches!(
        service
            .add_prescription(
                &AuthUser::from(&admin.user),
                request(json!({ "patientId": patient.id().to_string(), "doctorId": patient.id().to_string() })),
            )
            .await,
        Err(AppError::NotFound(message)) if message == "Doctor not found"
    );

    assert_matches!(
        service.add_prescription(&author, request(json!({ "patientId": patient.id().to_string() }))).await,
        Ok(prescription) if prescription.doctor_id == doctor.id()
    );
    assert_eq!(service.get_for_patient(patient.id()).await.unwrap().len(), 1);
}
