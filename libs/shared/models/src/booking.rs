use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One payment attempt as reported by the payment processor. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub appointment_id: Uuid,
    pub status: String,
    pub payment_reference_id: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub amount: f64,
    pub error: Option<String>,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBookingRecord {
    pub patient_id: Uuid,
    pub appointment_id: Uuid,
    pub status: String,
    pub payment_reference_id: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub amount: f64,
    pub error: Option<String>,
    pub is_booked: bool,
}

impl NewBookingRecord {
    pub fn into_record(self, id: Uuid, now: DateTime<Utc>) -> BookingRecord {
        BookingRecord {
            id,
            patient_id: self.patient_id,
            appointment_id: self.appointment_id,
            status: self.status,
            payment_reference_id: self.payment_reference_id,
            payment_date: self.payment_date,
            payment_method: self.payment_method,
            amount: self.amount,
            error: self.error,
            is_booked: self.is_booked,
            created_at: now,
        }
    }
}
