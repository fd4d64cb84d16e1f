use std::sync::Arc;

use axum::extract::{Extension, Path, Query, State};
use tracing::debug;

use doctor_cell::services::doctor::DoctorService;
use doctor_cell::DoctorSummary;
use shared_models::appointment::Appointment;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::pagination::{Page, PageParams};
use shared_models::response::ApiResponse;
use shared_utils::validation::{parse_id, ValidatedJson};
use shared_utils::AppState;

use crate::models::{BookAppointmentRequest, UpdateStatusRequest};
use crate::services::booking::BookingService;

fn booking_service(state: &AppState) -> BookingService {
    BookingService::new(state.store.clone(), state.config.strict_status_transitions)
}

pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(request): ValidatedJson<BookAppointmentRequest>,
) -> Result<ApiResponse<Appointment>, AppError> {
    debug!("Booking request from {} for doctor {}", user.id, request.doctor);

    let appointment = booking_service(&state).book_appointment(&user, request).await?;
    Ok(ApiResponse::created(appointment, "Appointment booked successfully"))
}

pub async fn update_appointment_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> Result<ApiResponse<Appointment>, AppError> {
    let appointment_id = parse_id("appointmentId", &appointment_id)?;

    let appointment = booking_service(&state)
        .set_booking_status(&user, appointment_id, request.status)
        .await?;
    Ok(ApiResponse::ok(appointment, "Appointment status updated successfully"))
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<String>,
) -> Result<ApiResponse<Appointment>, AppError> {
    let appointment_id = parse_id("appointmentId", &appointment_id)?;
    let appointment = booking_service(&state).get_appointment(&user, appointment_id).await?;
    Ok(ApiResponse::ok(appointment, "Appointment fetched successfully"))
}

pub async fn get_my_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<PageParams>,
) -> Result<ApiResponse<Page<Appointment>>, AppError> {
    let page = booking_service(&state)
        .list_for_user(&user, &params, state.config.default_page_limit)
        .await?;
    Ok(ApiResponse::ok(page, "Appointments fetched successfully"))
}

pub async fn get_all_doctors(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<ApiResponse<Page<DoctorSummary>>, AppError> {
    let page = DoctorService::new(state.store.clone())
        .list_doctors(&params, state.config.default_page_limit)
        .await?;
    Ok(ApiResponse::ok(page, "Doctor List Fetched Successfully"))
}
