use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use shared_database::StoreError;
use shared_models::appointment::Appointment;
use shared_models::error::AppError;
use shared_models::user::UserView;
use shared_utils::validation::{require_non_empty, ValidateRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookNowRequest {
    #[serde(default)]
    pub appointment_id: String,
}

impl ValidateRequest for BookNowRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("appointmentId", &self.appointment_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub payment_client_secret: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PaymentErrorDetail {
    pub message: Option<String>,
}

/// The subset of a Stripe PaymentIntent the API reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created: i64,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub last_payment_error: Option<PaymentErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    pub object: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct WebhookAck {
    pub received: bool,
    #[serde(rename = "type")]
    pub event_type: String,
}

/// An appointment joined with the user on the other side of it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub user_details: Option<UserView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailsResponse {
    pub booking_details: Vec<BookingDetails>,
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("You can only pay for your own appointments")]
    NotAppointmentOwner,

    #[error("Payment processor is not configured")]
    NotConfigured,

    #[error("Payment processor error: {message}")]
    StripeApiError { message: String },

    #[error("Webhook signature verification failed")]
    InvalidSignature,

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),

    #[error("Patient Id is required")]
    MissingPatientId,

    #[error("Appointment Id is required")]
    MissingAppointmentId,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        PaymentError::StripeApiError {
            message: err.to_string(),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::AppointmentNotFound => AppError::NotFound(err.to_string()),
            PaymentError::NotAppointmentOwner => AppError::Forbidden(err.to_string()),
            PaymentError::NotConfigured | PaymentError::StripeApiError { .. } => {
                AppError::ExternalService(err.to_string())
            }
            PaymentError::InvalidSignature
            | PaymentError::InvalidPayload(_)
            | PaymentError::MissingPatientId
            | PaymentError::MissingAppointmentId => AppError::BadRequest(err.to_string()),
            PaymentError::Store(e) => e.into(),
        }
    }
}
