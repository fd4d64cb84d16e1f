use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentFilter, AppointmentStatus, NewAppointment};
use shared_models::booking::{BookingRecord, NewBookingRecord};
use shared_models::error::AppError;
use shared_models::prescription::{NewPrescription, Prescription};
use shared_models::profile::{DoctorProfile, PatientProfile};
use shared_models::user::{NewUser, Role, User};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Backend(msg) | StoreError::Serialization(msg) => AppError::Database(msg),
        }
    }
}

/// Persistence boundary for every record the API owns.
///
/// Implementations must enforce two uniqueness rules: one user per email, and
/// at most one slot-occupying appointment per (doctor, checkup timing, date).
/// Violations surface as [`StoreError::Conflict`].
#[async_trait]
pub trait Store: Send + Sync {
    // --- Credentials ---
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn list_users_by_role(&self, role: Role) -> StoreResult<Vec<User>>;

    // --- Profiles (upserted by user id) ---
    async fn upsert_doctor_profile(&self, profile: DoctorProfile) -> StoreResult<DoctorProfile>;

    async fn get_doctor_profile(&self, user_id: Uuid) -> StoreResult<Option<DoctorProfile>>;

    async fn upsert_patient_profile(&self, profile: PatientProfile) -> StoreResult<PatientProfile>;

    async fn get_patient_profile(&self, user_id: Uuid) -> StoreResult<Option<PatientProfile>>;

    // --- Appointments ---
    async fn insert_appointment(&self, appointment: NewAppointment) -> StoreResult<Appointment>;

    /// The appointment currently holding (doctor, checkup timing, date), if any.
    async fn find_active_appointment(
        &self,
        doctor: Uuid,
        checkup_timing: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<Appointment>>;

    async fn get_appointment(&self, id: Uuid) -> StoreResult<Option<Appointment>>;

    /// Newest first.
    async fn list_appointments(&self, filter: &AppointmentFilter) -> StoreResult<Vec<Appointment>>;

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> StoreResult<Option<Appointment>>;

    // --- Payment records (append-only) ---
    async fn insert_booking_record(&self, record: NewBookingRecord) -> StoreResult<BookingRecord>;

    async fn list_booking_records(&self, patient_id: Uuid) -> StoreResult<Vec<BookingRecord>>;

    // --- Prescriptions ---
    async fn insert_prescription(&self, prescription: NewPrescription) -> StoreResult<Prescription>;

    async fn list_prescriptions(&self, patient_id: Uuid) -> StoreResult<Vec<Prescription>>;
}
