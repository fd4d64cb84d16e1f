use serde::Deserialize;
use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_utils::validation::{parse_date, parse_id, require_range, ValidateRequest};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPrescriptionRequest {
    #[serde(default)]
    pub patient_id: String,
    pub doctor_id: Option<String>,
    /// Falls back to the patient's registered name when blank.
    #[serde(default)]
    pub patient_name: String,
    pub age: Option<u32>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    pub notes: Option<String>,
    pub date: Option<String>,
}

impl ValidateRequest for AddPrescriptionRequest {
    fn validate(&self) -> Result<(), AppError> {
        parse_id("patientId", &self.patient_id)?;
        if let Some(doctor_id) = &self.doctor_id {
            parse_id("doctorId", doctor_id)?;
        }
        if let Some(age) = self.age {
            require_range("age", age, 0, 120)?;
        }
        if let Some(date) = &self.date {
            parse_date("date", date)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum PrescriptionError {
    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Doctors can only write prescriptions under their own name")]
    NotPrescriber,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PrescriptionError> for AppError {
    fn from(err: PrescriptionError) -> Self {
        match err {
            PrescriptionError::PatientNotFound | PrescriptionError::DoctorNotFound => {
                AppError::NotFound(err.to_string())
            }
            PrescriptionError::NotPrescriber => AppError::Forbidden(err.to_string()),
            PrescriptionError::Store(e) => e.into(),
        }
    }
}
