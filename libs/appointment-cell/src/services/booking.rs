use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::slots_for;
use shared_database::Store;
use shared_models::appointment::{Appointment, AppointmentFilter, AppointmentStatus, NewAppointment};
use shared_models::auth::AuthUser;
use shared_models::pagination::{Page, PageParams};
use shared_models::user::Role;
use shared_utils::validation::{parse_date, parse_id};

use crate::models::{AppointmentError, BookAppointmentRequest};
use crate::services::lifecycle::AppointmentLifecycleService;

pub struct BookingService {
    store: Arc<dyn Store>,
    lifecycle: AppointmentLifecycleService,
}

impl BookingService {
    pub fn new(store: Arc<dyn Store>, strict_status_transitions: bool) -> Self {
        Self {
            store,
            lifecycle: AppointmentLifecycleService::new(strict_status_transitions),
        }
    }

    /// Books `request` for `patient`. The request must already have passed
    /// boundary validation.
    pub async fn book_appointment(
        &self,
        patient: &AuthUser,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        if patient.role != Role::Patient {
            return Err(AppointmentError::NotPatient);
        }

        let doctor_id = parse_id("doctor", &request.doctor).map_err(|_| AppointmentError::DoctorNotFound)?;
        let date = parse_date("date", &request.date).map_err(|e| AppointmentError::InvalidRequest(e.to_string()))?;
        let checkup_timing = request.checkup_timing.trim().to_string();

        let doctor = self
            .store
            .find_user_by_id(doctor_id)
            .await?
            .ok_or(AppointmentError::DoctorNotFound)?;

        if doctor.role != Role::Doctor {
            return Err(AppointmentError::InvalidTarget);
        }

        if let Some(profile) = self.store.get_doctor_profile(doctor_id).await? {
            match slots_for(&profile.consultation_timing) {
                Ok(slots) if !slots.contains(&checkup_timing) => {
                    return Err(AppointmentError::OutsideConsultationHours(checkup_timing));
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping hours check for doctor {}: {}", doctor_id, e),
            }
        }

        if let Some(existing) = self
            .store
            .find_active_appointment(doctor_id, &checkup_timing, date)
            .await?
        {
            debug!("Slot {} on {} already held by appointment {}", checkup_timing, date, existing.id);
            return Err(AppointmentError::AlreadyBooked);
        }

        let appointment = self
            .store
            .insert_appointment(NewAppointment {
                doctor: doctor_id,
                booked_by: patient.id,
                checkup_timing,
                date,
                notes: request.notes,
                health_issues: request.health_issues,
            })
            .await?;

        info!(
            "Appointment {} booked with doctor {} for {} {}",
            appointment.id, doctor_id, appointment.date, appointment.checkup_timing
        );
        Ok(appointment)
    }

    /// Only the appointment's doctor or an admin may change its status.
    pub async fn set_booking_status(
        &self,
        caller: &AuthUser,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .store
            .get_appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if !(caller.is_admin() || appointment.doctor == caller.id) {
            return Err(AppointmentError::Unauthorized);
        }

        self.lifecycle.validate_status_transition(appointment.status, status)?;

        let updated = self
            .store
            .update_appointment_status(appointment_id, status)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        info!("Appointment {} moved {} -> {}", appointment_id, appointment.status, status);
        Ok(updated)
    }

    pub async fn get_appointment(&self, caller: &AuthUser, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .store
            .get_appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if caller.is_admin() || appointment.doctor == caller.id || appointment.booked_by == caller.id {
            Ok(appointment)
        } else {
            Err(AppointmentError::Unauthorized)
        }
    }

    /// Patients see what they booked, doctors what was booked with them, admins everything.
    pub async fn list_for_user(
        &self,
        caller: &AuthUser,
        params: &PageParams,
        default_limit: u32,
    ) -> Result<Page<Appointment>, AppointmentError> {
        let filter = match caller.role {
            Role::Patient => AppointmentFilter::for_patient(caller.id),
            Role::Doctor => AppointmentFilter::for_doctor(caller.id),
            Role::Admin => AppointmentFilter::default(),
        };

        let appointments = self.store.list_appointments(&filter).await?;
        Ok(Page::from_all(appointments, params, default_limit))
    }
}
