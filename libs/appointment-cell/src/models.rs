use serde::Deserialize;
use thiserror::Error;

use doctor_cell::is_slot_label;
use shared_database::StoreError;
use shared_models::appointment::AppointmentStatus;
use shared_models::error::AppError;
use shared_utils::validation::{parse_date, require_non_empty, ValidateRequest};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor: String,
    pub checkup_timing: String,
    pub date: String,
    #[serde(default)]
    pub notes: String,
    pub health_issues: Option<String>,
}

impl ValidateRequest for BookAppointmentRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("doctor", &self.doctor)?;
        if !is_slot_label(self.checkup_timing.trim()) {
            return Err(AppError::ValidationError(
                "checkupTiming must be a one-hour slot such as 9-10".to_string(),
            ));
        }
        parse_date("date", &self.date)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

impl ValidateRequest for UpdateStatusRequest {
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("This slot is already booked for the selected date")]
    AlreadyBooked,

    #[error("Only patients are allowed to book the appointment")]
    NotPatient,

    #[error("Appointments can only be booked with a doctor")]
    InvalidTarget,

    #[error("Slot {0} is outside the doctor's consultation hours")]
    OutsideConsultationHours(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Unauthorized access to appointment")]
    Unauthorized,

    #[error("Appointment cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AppointmentError {
    fn from(err: StoreError) -> Self {
        match err {
            // The store's slot uniqueness check is the last line against double booking.
            StoreError::Conflict(_) => AppointmentError::AlreadyBooked,
            other => AppointmentError::Store(other),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound | AppointmentError::DoctorNotFound => AppError::NotFound(err.to_string()),
            AppointmentError::AlreadyBooked => AppError::Conflict(err.to_string()),
            AppointmentError::NotPatient | AppointmentError::Unauthorized => AppError::Forbidden(err.to_string()),
            AppointmentError::InvalidTarget
            | AppointmentError::InvalidRequest(_)
            | AppointmentError::OutsideConsultationHours(_)
            | AppointmentError::InvalidStatusTransition { .. } => AppError::ValidationError(err.to_string()),
            AppointmentError::Store(e) => e.into(),
        }
    }
}
