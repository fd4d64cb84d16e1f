use std::sync::Arc;

use axum::extract::{Extension, State};

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::prescription::Prescription;
use shared_models::response::ApiResponse;
use shared_models::user::Role;
use shared_utils::extractor::ensure_role;
use shared_utils::validation::ValidatedJson;
use shared_utils::AppState;

use crate::models::AddPrescriptionRequest;
use crate::services::prescription::PrescriptionService;

pub async fn add_prescription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(request): ValidatedJson<AddPrescriptionRequest>,
) -> Result<ApiResponse<Prescription>, AppError> {
    ensure_role(&user, &[Role::Doctor, Role::Admin])?;

    let prescription = PrescriptionService::new(state.store.clone())
        .add_prescription(&user, request)
        .await?;
    Ok(ApiResponse::created(prescription, "Prescription added successfully"))
}

pub async fn get_prescriptions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<Prescription>>, AppError> {
    let prescriptions = PrescriptionService::new(state.store.clone())
        .get_for_patient(user.id)
        .await?;
    Ok(ApiResponse::ok(prescriptions, "Prescription Details fetched successfully"))
}
