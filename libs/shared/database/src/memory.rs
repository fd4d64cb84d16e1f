use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentFilter, AppointmentStatus, NewAppointment};
use shared_models::booking::{BookingRecord, NewBookingRecord};
use shared_models::prescription::{NewPrescription, Prescription};
use shared_models::profile::{DoctorProfile, PatientProfile};
use shared_models::user::{NewUser, Role, User};

use crate::store::{Store, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    doctor_profiles: HashMap<Uuid, DoctorProfile>,
    patient_profiles: HashMap<Uuid, PatientProfile>,
    appointments: HashMap<Uuid, Appointment>,
    booking_records: Vec<BookingRecord>,
    prescriptions: Vec<Prescription>,
}

/// Process-local store used for development and tests. All tables sit behind a
/// single lock, so the uniqueness checks and the write happen atomically.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn appointment_count(&self) -> usize {
        self.tables.read().await.appointments.len()
    }

    pub async fn booking_record_count(&self) -> usize {
        self.tables.read().await.booking_records.len()
    }
}

fn slot_taken(tables: &Tables, doctor: Uuid, checkup_timing: &str, date: NaiveDate, except: Option<Uuid>) -> bool {
    tables.appointments.values().any(|a| {
        Some(a.id) != except && a.occupies_slot() && a.is_same_slot(doctor, checkup_timing, date)
    })
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Conflict(format!("Email {} already registered", user.email)));
        }

        let user = user.into_user(Uuid::new_v4(), Utc::now());
        tables.users.insert(user.id, user.clone());
        debug!("Inserted user {}", user.id);
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn list_users_by_role(&self, role: Role) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().filter(|u| u.role == role).cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn upsert_doctor_profile(&self, mut profile: DoctorProfile) -> StoreResult<DoctorProfile> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.doctor_profiles.get(&profile.user_id) {
            profile.created_at = existing.created_at;
        }
        tables.doctor_profiles.insert(profile.user_id, profile.clone());
        Ok(profile)
    }

    async fn get_doctor_profile(&self, user_id: Uuid) -> StoreResult<Option<DoctorProfile>> {
        Ok(self.tables.read().await.doctor_profiles.get(&user_id).cloned())
    }

    async fn upsert_patient_profile(&self, mut profile: PatientProfile) -> StoreResult<PatientProfile> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.patient_profiles.get(&profile.user_id) {
            profile.created_at = existing.created_at;
        }
        tables.patient_profiles.insert(profile.user_id, profile.clone());
        Ok(profile)
    }

    async fn get_patient_profile(&self, user_id: Uuid) -> StoreResult<Option<PatientProfile>> {
        Ok(self.tables.read().await.patient_profiles.get(&user_id).cloned())
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> StoreResult<Appointment> {
        let mut tables = self.tables.write().await;

        if slot_taken(&tables, appointment.doctor, &appointment.checkup_timing, appointment.date, None) {
            return Err(StoreError::Conflict(format!(
                "Slot {} on {} is already booked",
                appointment.checkup_timing, appointment.date
            )));
        }

        let appointment = appointment.into_appointment(Uuid::new_v4(), Utc::now());
        tables.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn find_active_appointment(
        &self,
        doctor: Uuid,
        checkup_timing: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<Appointment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .appointments
            .values()
            .find(|a| a.occupies_slot() && a.is_same_slot(doctor, checkup_timing, date))
            .cloned())
    }

    async fn get_appointment(&self, id: Uuid) -> StoreResult<Option<Appointment>> {
        Ok(self.tables.read().await.appointments.get(&id).cloned())
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> StoreResult<Vec<Appointment>> {
        let tables = self.tables.read().await;
        let mut appointments: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        appointments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(appointments)
    }

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> StoreResult<Option<Appointment>> {
        let mut tables = self.tables.write().await;

        let Some(current) = tables.appointments.get(&id).cloned() else {
            return Ok(None);
        };

        // Re-activating a rejected appointment must not collide with a newer booking.
        if !current.occupies_slot()
            && status.occupies_slot()
            && slot_taken(&tables, current.doctor, &current.checkup_timing, current.date, Some(id))
        {
            return Err(StoreError::Conflict(format!(
                "Slot {} on {} is already booked",
                current.checkup_timing, current.date
            )));
        }

        let appointment = tables
            .appointments
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("Appointment {}", id)))?;
        appointment.status = status;
        appointment.updated_at = Utc::now();
        Ok(Some(appointment.clone()))
    }

    async fn insert_booking_record(&self, record: NewBookingRecord) -> StoreResult<BookingRecord> {
        let mut tables = self.tables.write().await;
        let record = record.into_record(Uuid::new_v4(), Utc::now());
        tables.booking_records.push(record.clone());
        Ok(record)
    }

    async fn list_booking_records(&self, patient_id: Uuid) -> StoreResult<Vec<BookingRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .booking_records
            .iter()
            .rev()
            .filter(|r| r.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn insert_prescription(&self, prescription: NewPrescription) -> StoreResult<Prescription> {
        let mut tables = self.tables.write().await;
        let prescription = prescription.into_prescription(Uuid::new_v4(), Utc::now());
        tables.prescriptions.push(prescription.clone());
        Ok(prescription)
    }

    async fn list_prescriptions(&self, patient_id: Uuid) -> StoreResult<Vec<Prescription>> {
        let tables = self.tables.read().await;
        Ok(tables
            .prescriptions
            .iter()
            .rev()
            .filter(|p| p.patient_id == patient_id)
            .cloned()
            .collect())
    }
}
