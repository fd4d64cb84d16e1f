use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub doctor: Uuid,
    pub booked_by: Uuid,
    pub checkup_timing: String,
    pub date: NaiveDate,
    pub notes: String,
    pub health_issues: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Rejected appointments release their slot; every other status holds it.
    pub fn occupies_slot(&self) -> bool {
        self.status.occupies_slot()
    }

    pub fn is_same_slot(&self, doctor: Uuid, checkup_timing: &str, date: NaiveDate) -> bool {
        self.doctor == doctor && self.checkup_timing == checkup_timing && self.date == date
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    /// Set by payment reconciliation once the payment intent succeeds.
    Success,
}

impl AppointmentStatus {
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Rejected)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "Pending"),
            AppointmentStatus::Accepted => write!(f, "Accepted"),
            AppointmentStatus::Rejected => write!(f, "Rejected"),
            AppointmentStatus::Completed => write!(f, "Completed"),
            AppointmentStatus::Success => write!(f, "Success"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub doctor: Uuid,
    pub booked_by: Uuid,
    pub checkup_timing: String,
    pub date: NaiveDate,
    pub notes: String,
    pub health_issues: Option<String>,
}

impl NewAppointment {
    pub fn into_appointment(self, id: Uuid, now: DateTime<Utc>) -> Appointment {
        Appointment {
            id,
            doctor: self.doctor,
            booked_by: self.booked_by,
            checkup_timing: self.checkup_timing,
            date: self.date,
            notes: self.notes,
            health_issues: self.health_issues,
            status: AppointmentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Selection used by listings; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub doctor: Option<Uuid>,
    pub booked_by: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

impl AppointmentFilter {
    pub fn for_doctor(doctor: Uuid) -> Self {
        Self {
            doctor: Some(doctor),
            ..Default::default()
        }
    }

    pub fn for_patient(patient: Uuid) -> Self {
        Self {
            booked_by: Some(patient),
            ..Default::default()
        }
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.doctor.map_or(true, |d| appointment.doctor == d)
            && self.booked_by.map_or(true, |p| appointment.booked_by == p)
            && self.date.map_or(true, |d| appointment.date == d)
    }
}
