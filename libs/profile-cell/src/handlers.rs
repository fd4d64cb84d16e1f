use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Extension;

use doctor_cell::services::catalogue::DOCTOR_TYPES;
use doctor_cell::DoctorType;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::profile::ProfileView;
use shared_models::response::ApiResponse;
use shared_utils::AppState;

use crate::services::form::read_profile_form;
use crate::services::profile::ProfileService;
use crate::services::storage::storage_for;

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<ApiResponse<ProfileView>, AppError> {
    let view = ProfileService::new(state.store.clone()).get_profile(user.id).await?;
    Ok(ApiResponse::ok(view, "Profile fetched successfully"))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiResponse<ProfileView>, AppError> {
    let multipart = multipart.map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;
    let form = read_profile_form(multipart).await?;
    let storage = storage_for(&state.config);

    let view = ProfileService::new(state.store.clone())
        .update_profile(user.id, form, storage.as_ref())
        .await?;

    Ok(ApiResponse::ok(view, "Profile updated successfully"))
}

pub async fn get_doctor_types() -> ApiResponse<Vec<DoctorType>> {
    ApiResponse::ok(DOCTOR_TYPES.to_vec(), "Doctor Types fetched successfully")
}
