use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_models::profile::DoctorProfile;
use shared_models::user::UserView;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DoctorType {
    pub id: &'static str,
    pub title: &'static str,
}

/// One bookable hour and whether it is already held on `date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    pub slot_timing: String,
    pub is_booked: bool,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorSummary {
    #[serde(flatten)]
    pub user: UserView,
    pub profile: Option<DoctorProfile>,
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AvailabilityError {
    #[error("Invalid consultation timing '{0}', expected a range such as 9AM-5PM")]
    ParseError(String),
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::Availability(e) => e.into(),
            DoctorError::Store(e) => e.into(),
        }
    }
}
