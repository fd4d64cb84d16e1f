use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{Store, StoreError};
use shared_models::appointment::{Appointment, AppointmentFilter, AppointmentStatus};
use shared_models::booking::{BookingRecord, NewBookingRecord};
use shared_models::user::UserView;
use shared_utils::AppState;

use crate::models::{BookingDetails, PaymentError, PaymentIntent, WebhookAck, WebhookEvent};
use crate::services::stripe::StripeClient;

pub const EVENT_SUCCEEDED: &str = "payment_intent.succeeded";
pub const EVENT_FAILED: &str = "payment_intent.payment_failed";
pub const EVENT_CREATED: &str = "payment_intent.created";
pub const EVENT_CHARGE_SUCCEEDED: &str = "charge.succeeded";

pub struct PaymentService {
    store: Arc<dyn Store>,
    config: Arc<AppConfig>,
}

impl PaymentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            config: state.config.clone(),
        }
    }

    /// Creates a payment intent for an appointment the caller booked and
    /// returns its client secret.
    #[instrument(skip(self))]
    pub async fn create_payment_intent(&self, user_id: Uuid, appointment_id: Uuid) -> Result<String, PaymentError> {
        let appointment = self
            .store
            .get_appointment(appointment_id)
            .await?
            .ok_or(PaymentError::AppointmentNotFound)?;

        if appointment.booked_by != user_id {
            return Err(PaymentError::NotAppointmentOwner);
        }

        let intent = StripeClient::new(&self.config)?
            .create_payment_intent(
                self.config.payment_amount_cents,
                &self.config.payment_currency,
                appointment_id,
                user_id,
            )
            .await?;

        intent.client_secret.ok_or_else(|| PaymentError::StripeApiError {
            message: format!("Payment intent {} has no client secret", intent.id),
        })
    }

    /// Applies a verified webhook event. Only success and failure events
    /// change state; the rest are acknowledged and logged.
    #[instrument(skip(self, event), fields(event_type = %event.event_type))]
    pub async fn handle_event(&self, event: WebhookEvent) -> Result<WebhookAck, PaymentError> {
        match event.event_type.as_str() {
            EVENT_SUCCEEDED => self.record_success(&parse_intent(&event)?).await?,
            EVENT_FAILED => self.record_failure(&parse_intent(&event)?).await?,
            EVENT_CREATED => info!("Payment intent created {}", object_id(&event)),
            EVENT_CHARGE_SUCCEEDED => info!("Payment charge succeeded {}", object_id(&event)),
            other => info!("Unhandled event type {}", other),
        }

        Ok(WebhookAck {
            received: true,
            event_type: event.event_type,
        })
    }

    async fn record_success(&self, intent: &PaymentIntent) -> Result<(), PaymentError> {
        let (patient_id, appointment_id) = intent_owner(intent)?;

        // The record is written either way; isBooked says whether the
        // appointment actually moved to Success.
        let error = match self
            .store
            .update_appointment_status(appointment_id, AppointmentStatus::Success)
            .await
        {
            Ok(Some(_)) => None,
            Ok(None) => {
                warn!("Payment {} references unknown appointment {}", intent.id, appointment_id);
                Some(format!("Appointment {} not found", appointment_id))
            }
            Err(StoreError::Conflict(message)) => {
                warn!("Payment {} could not book appointment {}: {}", intent.id, appointment_id, message);
                Some(message)
            }
            Err(e) => return Err(e.into()),
        };

        self.store
            .insert_booking_record(NewBookingRecord {
                patient_id,
                appointment_id,
                status: intent.status.clone(),
                payment_reference_id: Some(intent.id.clone()),
                payment_date: payment_date(intent.created),
                payment_method: intent.payment_method.clone(),
                amount: intent.amount as f64 / 100.0,
                is_booked: error.is_none(),
                error,
            })
            .await?;

        info!("PaymentIntent for {} was successful", intent.amount);
        Ok(())
    }

    async fn record_failure(&self, intent: &PaymentIntent) -> Result<(), PaymentError> {
        let (patient_id, appointment_id) = intent_owner(intent)?;
        let error = intent
            .last_payment_error
            .as_ref()
            .and_then(|e| e.message.clone());

        warn!("Payment failed for appointment {}: {:?}", appointment_id, error);

        self.store
            .insert_booking_record(NewBookingRecord {
                patient_id,
                appointment_id,
                status: intent.status.clone(),
                payment_reference_id: Some(intent.id.clone()),
                payment_date: payment_date(intent.created),
                payment_method: intent.payment_method.clone(),
                amount: intent.amount as f64 / 100.0,
                error,
                is_booked: false,
            })
            .await?;
        Ok(())
    }

    /// Appointments the caller booked, each with the doctor's user view.
    pub async fn get_bookings(&self, user_id: Uuid) -> Result<Vec<BookingDetails>, PaymentError> {
        let appointments = self.store.list_appointments(&AppointmentFilter::for_patient(user_id)).await?;
        self.join_users(appointments, |a| a.doctor).await
    }

    /// Appointments assigned to the calling doctor, each with the patient's user view.
    pub async fn get_booking_users(&self, user_id: Uuid) -> Result<Vec<BookingDetails>, PaymentError> {
        let appointments = self.store.list_appointments(&AppointmentFilter::for_doctor(user_id)).await?;
        self.join_users(appointments, |a| a.booked_by).await
    }

    pub async fn get_records(&self, user_id: Uuid) -> Result<Vec<BookingRecord>, PaymentError> {
        Ok(self.store.list_booking_records(user_id).await?)
    }

    async fn join_users(
        &self,
        appointments: Vec<Appointment>,
        other_party: impl Fn(&Appointment) -> Uuid,
    ) -> Result<Vec<BookingDetails>, PaymentError> {
        let mut users: HashMap<Uuid, Option<UserView>> = HashMap::new();
        let mut details = Vec::with_capacity(appointments.len());

        for appointment in appointments {
            let id = other_party(&appointment);
            if !users.contains_key(&id) {
                let user = self.store.find_user_by_id(id).await?;
                users.insert(id, user.as_ref().map(UserView::from));
            }
            details.push(BookingDetails {
                user_details: users.get(&id).cloned().flatten(),
                appointment,
            });
        }

        Ok(details)
    }
}

fn parse_intent(event: &WebhookEvent) -> Result<PaymentIntent, PaymentError> {
    serde_json::from_value(event.data.object.clone()).map_err(|e| PaymentError::InvalidPayload(e.to_string()))
}

fn object_id(event: &WebhookEvent) -> &str {
    event.data.object.get("id").and_then(|v| v.as_str()).unwrap_or_default()
}

fn intent_owner(intent: &PaymentIntent) -> Result<(Uuid, Uuid), PaymentError> {
    let patient_id = intent
        .metadata
        .get("userId")
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or(PaymentError::MissingPatientId)?;
    let appointment_id = intent
        .metadata
        .get("appointmentId")
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or(PaymentError::MissingAppointmentId)?;
    Ok((patient_id, appointment_id))
}

fn payment_date(created: i64) -> Option<DateTime<Utc>> {
    if created <= 0 {
        return None;
    }
    DateTime::from_timestamp(created, 0)
}
