use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::appointment::{Appointment, AppointmentFilter, AppointmentStatus, NewAppointment};
use shared_models::booking::{BookingRecord, NewBookingRecord};
use shared_models::prescription::{NewPrescription, Prescription};
use shared_models::profile::{DoctorProfile, PatientProfile};
use shared_models::user::{NewUser, Role, User};

use crate::store::{Store, StoreError, StoreResult};
use crate::supabase::SupabaseClient;

/// [`Store`] backed by PostgREST tables. Each record is stored with its
/// camelCase field names as columns. The database is expected to carry a unique
/// index on `users.email` and a partial unique index on
/// `appointments (doctor, "checkupTiming", date) WHERE status <> 'Rejected'`,
/// which PostgREST reports as HTTP 409.
pub struct SupabaseStore {
    supabase: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub fn with_client(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }

    async fn select<T: DeserializeOwned>(&self, path: &str) -> StoreResult<Vec<T>> {
        self.supabase.request(Method::GET, path, None).await
    }

    async fn select_one<T: DeserializeOwned>(&self, path: &str) -> StoreResult<Option<T>> {
        let rows: Vec<T> = self.select(path).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert<T: Serialize + DeserializeOwned>(&self, table: &str, record: &T) -> StoreResult<T> {
        self.write(Method::POST, &format!("/rest/v1/{}", table), to_value(record)?, "return=representation")
            .await?
            .ok_or_else(|| StoreError::Backend(format!("Insert into {} returned no rows", table)))
    }

    async fn upsert<T: Serialize + DeserializeOwned>(&self, table: &str, record: &T) -> StoreResult<T> {
        let path = format!("/rest/v1/{}?on_conflict=userId", table);
        self.write(Method::POST, &path, to_value(record)?, "resolution=merge-duplicates,return=representation")
            .await?
            .ok_or_else(|| StoreError::Backend(format!("Upsert into {} returned no rows", table)))
    }

    async fn write<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Value,
        prefer: &'static str,
    ) -> StoreResult<Option<T>> {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static(prefer));

        let rows: Vec<T> = self
            .supabase
            .request_with_headers(method, path, Some(body), Some(headers))
            .await?;
        Ok(rows.into_iter().next())
    }
}

fn to_value<T: Serialize>(record: &T) -> StoreResult<Value> {
    serde_json::to_value(record).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn enc(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[async_trait]
impl Store for SupabaseStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let user = user.into_user(Uuid::new_v4(), Utc::now());
        debug!("Inserting user {}", user.id);
        self.insert("users", &user).await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let path = format!("/rest/v1/users?email=eq.{}&limit=1", enc(&email.to_lowercase()));
        self.select_one(&path).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.select_one(&format!("/rest/v1/users?id=eq.{}&limit=1", id)).await
    }

    async fn list_users_by_role(&self, role: Role) -> StoreResult<Vec<User>> {
        self.select(&format!("/rest/v1/users?role=eq.{}&order=createdAt.desc", role))
            .await
    }

    async fn upsert_doctor_profile(&self, profile: DoctorProfile) -> StoreResult<DoctorProfile> {
        self.upsert("doctor_profiles", &profile).await
    }

    async fn get_doctor_profile(&self, user_id: Uuid) -> StoreResult<Option<DoctorProfile>> {
        self.select_one(&format!("/rest/v1/doctor_profiles?userId=eq.{}&limit=1", user_id))
            .await
    }

    async fn upsert_patient_profile(&self, profile: PatientProfile) -> StoreResult<PatientProfile> {
        self.upsert("patient_profiles", &profile).await
    }

    async fn get_patient_profile(&self, user_id: Uuid) -> StoreResult<Option<PatientProfile>> {
        self.select_one(&format!("/rest/v1/patient_profiles?userId=eq.{}&limit=1", user_id))
            .await
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> StoreResult<Appointment> {
        let appointment = appointment.into_appointment(Uuid::new_v4(), Utc::now());
        self.insert("appointments", &appointment).await
    }

    async fn find_active_appointment(
        &self,
        doctor: Uuid,
        checkup_timing: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<Appointment>> {
        let path = format!(
            "/rest/v1/appointments?doctor=eq.{}&checkupTiming=eq.{}&date=eq.{}&status=neq.{}&limit=1",
            doctor,
            enc(checkup_timing),
            date,
            AppointmentStatus::Rejected
        );
        self.select_one(&path).await
    }

    async fn get_appointment(&self, id: Uuid) -> StoreResult<Option<Appointment>> {
        self.select_one(&format!("/rest/v1/appointments?id=eq.{}&limit=1", id))
            .await
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> StoreResult<Vec<Appointment>> {
        let mut query_parts = Vec::new();
        if let Some(doctor) = filter.doctor {
            query_parts.push(format!("doctor=eq.{}", doctor));
        }
        if let Some(booked_by) = filter.booked_by {
            query_parts.push(format!("bookedBy=eq.{}", booked_by));
        }
        if let Some(date) = filter.date {
            query_parts.push(format!("date=eq.{}", date));
        }
        query_parts.push("order=createdAt.desc".to_string());

        self.select(&format!("/rest/v1/appointments?{}", query_parts.join("&")))
            .await
    }

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> StoreResult<Option<Appointment>> {
        let body = json!({
            "status": status,
            "updatedAt": Utc::now(),
        });
        self.write(
            Method::PATCH,
            &format!("/rest/v1/appointments?id=eq.{}", id),
            body,
            "return=representation",
        )
        .await
    }

    async fn insert_booking_record(&self, record: NewBookingRecord) -> StoreResult<BookingRecord> {
        let record = record.into_record(Uuid::new_v4(), Utc::now());
        self.insert("booking_records", &record).await
    }

    async fn list_booking_records(&self, patient_id: Uuid) -> StoreResult<Vec<BookingRecord>> {
        self.select(&format!(
            "/rest/v1/booking_records?patientId=eq.{}&order=createdAt.desc",
            patient_id
        ))
        .await
    }

    async fn insert_prescription(&self, prescription: NewPrescription) -> StoreResult<Prescription> {
        let prescription = prescription.into_prescription(Uuid::new_v4(), Utc::now());
        self.insert("prescriptions", &prescription).await
    }

    async fn list_prescriptions(&self, patient_id: Uuid) -> StoreResult<Vec<Prescription>> {
        self.select(&format!(
            "/rest/v1/prescriptions?patientId=eq.{}&order=createdAt.desc",
            patient_id
        ))
        .await
    }
}
