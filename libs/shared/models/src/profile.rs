use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::user::UserView;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub user_id: Uuid,
    pub name: String,
    pub age: u32,
    pub contact_number: String,
    pub address: String,
    pub specialization: String,
    pub experience: u32,
    pub consultation_timing: String,
    pub license_number: Option<String>,
    pub education: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub consultation_fee: Option<f64>,
    pub is_available: bool,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl FromStr for BloodGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A+" => Ok(BloodGroup::APositive),
            "A-" => Ok(BloodGroup::ANegative),
            "B+" => Ok(BloodGroup::BPositive),
            "B-" => Ok(BloodGroup::BNegative),
            "AB+" => Ok(BloodGroup::AbPositive),
            "AB-" => Ok(BloodGroup::AbNegative),
            "O+" => Ok(BloodGroup::OPositive),
            "O-" => Ok(BloodGroup::ONegative),
            other => Err(format!("Unknown blood group: {}", other)),
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub user_id: Uuid,
    pub name: String,
    pub age: u32,
    pub contact_number: String,
    pub address: String,
    pub blood_group: BloodGroup,
    pub weight: f64,
    pub height: f64,
    pub ongoing_treatment: Option<String>,
    #[serde(default)]
    pub health_issues: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Profile {
    Doctor(DoctorProfile),
    Patient(PatientProfile),
}

impl Profile {
    pub fn profile_image(&self) -> Option<&str> {
        match self {
            Profile::Doctor(p) => p.profile_image.as_deref(),
            Profile::Patient(p) => p.profile_image.as_deref(),
        }
    }
}

/// Base user record plus the role-specific profile, `None` until first update.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfileView {
    pub user: UserView,
    pub profile: Option<Profile>,
}
