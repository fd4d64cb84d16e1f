use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[serde(alias = "doctor", alias = "Doctor")]
    Doctor,
    #[serde(alias = "patient", alias = "Patient")]
    Patient,
    #[serde(alias = "admin", alias = "Admin")]
    Admin,
}

impl Role {
    /// Maps the legacy `isDoctor` flag onto the role model.
    pub fn from_legacy_flag(is_doctor: bool) -> Self {
        if is_doctor {
            Role::Doctor
        } else {
            Role::Patient
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Doctor => write!(f, "DOCTOR"),
            Role::Patient => write!(f, "PATIENT"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

/// Credential record. Never serialized to API clients; see [`UserView`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub dob: Option<NaiveDate>,
    pub contact_no: Option<String>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub dob: Option<NaiveDate>,
    pub contact_no: Option<String>,
    pub gender: Option<String>,
}

impl NewUser {
    pub fn into_user(self, id: Uuid, now: DateTime<Utc>) -> User {
        User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            role: self.role,
            dob: self.dob,
            contact_no: self.contact_no,
            gender: self.gender,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public view of a user. `isDoctor` is derived for clients that still read
/// the legacy flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_doctor: bool,
    pub dob: Option<NaiveDate>,
    pub contact_no: Option<String>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            is_doctor: user.role == Role::Doctor,
            dob: user.dob,
            contact_no: user.contact_no.clone(),
            gender: user.gender.clone(),
            created_at: user.created_at,
        }
    }
}
