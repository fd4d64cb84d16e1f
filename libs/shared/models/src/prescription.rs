use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_name: String,
    pub age: Option<u32>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    pub notes: Option<String>,
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPrescription {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_name: String,
    pub age: Option<u32>,
    pub symptoms: Vec<String>,
    pub diagnosis: Option<String>,
    pub medications: Vec<String>,
    pub notes: Option<String>,
    pub date: Option<NaiveDate>,
}

impl NewPrescription {
    pub fn into_prescription(self, id: Uuid, now: DateTime<Utc>) -> Prescription {
        Prescription {
            id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            patient_name: self.patient_name,
            age: self.age,
            symptoms: self.symptoms,
            diagnosis: self.diagnosis,
            medications: self.medications,
            notes: self.notes,
            date: self.date,
            created_at: now,
        }
    }
}
