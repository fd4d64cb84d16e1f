use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use shared_database::Store;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::prescription::{NewPrescription, Prescription};
use shared_models::user::Role;
use shared_utils::validation::{parse_date, parse_id};

use crate::models::{AddPrescriptionRequest, PrescriptionError};

pub struct PrescriptionService {
    store: Arc<dyn Store>,
}

impl PrescriptionService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Stores a prescription written by `author`. `doctorId` defaults to the
    /// author; only an admin may file one for another doctor.
    #[instrument(skip(self, author, request), fields(author = %author.id))]
    pub async fn add_prescription(
        &self,
        author: &AuthUser,
        request: AddPrescriptionRequest,
    ) -> Result<Prescription, AppError> {
        let patient_id = parse_id("patientId", &request.patient_id)?;
        let doctor_id = match &request.doctor_id {
            Some(id) => parse_id("doctorId", id)?,
            None => author.id,
        };
        let date = request.date.as_deref().map(|d| parse_date("date", d)).transpose()?;

        if author.role == Role::Doctor && doctor_id != author.id {
            return Err(PrescriptionError::NotPrescriber.into());
        }

        let patient = self
            .store
            .find_user_by_id(patient_id)
            .await
            .map_err(PrescriptionError::from)?
            .ok_or(PrescriptionError::PatientNotFound)?;

        let doctor_exists = self
            .store
            .find_user_by_id(doctor_id)
            .await
            .map_err(PrescriptionError::from)?
            .is_some_and(|u| u.role == Role::Doctor);
        if !doctor_exists {
            return Err(PrescriptionError::DoctorNotFound.into());
        }

        let patient_name = if request.patient_name.trim().is_empty() {
            patient.full_name
        } else {
            request.patient_name.trim().to_string()
        };

        let prescription = self
            .store
            .insert_prescription(NewPrescription {
                patient_id,
                doctor_id,
                patient_name,
                age: request.age,
                symptoms: request.symptoms,
                diagnosis: request.diagnosis,
                medications: request.medications,
                notes: request.notes,
                date,
            })
            .await
            .map_err(PrescriptionError::from)?;

        info!("Prescription {} added for patient {}", prescription.id, patient_id);
        Ok(prescription)
    }

    pub async fn get_for_patient(&self, patient_id: Uuid) -> Result<Vec<Prescription>, PrescriptionError> {
        Ok(self.store.list_prescriptions(patient_id).await?)
    }
}
