use std::sync::Arc;

use axum::extract::{Path, Query, State};

use shared_models::error::AppError;
use shared_models::response::ApiResponse;
use shared_utils::validation::{parse_date, parse_id};
use shared_utils::AppState;

use crate::models::{DoctorType, SlotAvailability, SlotQuery};
use crate::services::availability::AvailabilityService;
use crate::services::catalogue::DOCTOR_TYPES;

pub async fn get_doctor_types() -> ApiResponse<Vec<DoctorType>> {
    ApiResponse::ok(DOCTOR_TYPES.to_vec(), "Doctor Types fetched successfully")
}

pub async fn get_doctor_slots(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
    Query(query): Query<SlotQuery>,
) -> Result<ApiResponse<Vec<SlotAvailability>>, AppError> {
    let doctor_id = parse_id("doctorId", &doctor_id)?;
    let date = query
        .date
        .as_deref()
        .ok_or_else(|| AppError::ValidationError("date is required".to_string()))
        .and_then(|date| parse_date("date", date))?;

    let slots = AvailabilityService::new(state.store.clone())
        .get_slot_availability(doctor_id, date)
        .await?;

    Ok(ApiResponse::ok(slots, "Slots fetched successfully"))
}
