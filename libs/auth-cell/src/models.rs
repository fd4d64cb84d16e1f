use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;
use shared_models::user::Role;
use shared_utils::validation::{is_valid_email, require_non_empty, ValidateRequest};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Option<Role>,
    /// Legacy flag, consulted only when `role` is absent.
    pub is_doctor: Option<bool>,
    pub dob: Option<NaiveDate>,
    pub contact_no: Option<String>,
    pub gender: Option<String>,
}

impl RegisterRequest {
    pub fn resolved_role(&self) -> Role {
        self.role
            .unwrap_or_else(|| Role::from_legacy_flag(self.is_doctor.unwrap_or(false)))
    }
}

impl ValidateRequest for RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        if !is_valid_email(self.email.trim()) {
            return Err(AppError::ValidationError("A valid email is required".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::ValidationError(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }
        require_non_empty("fullName", &self.full_name)?;
        if self.resolved_role() == Role::Admin {
            return Err(AppError::ValidationError(
                "Admin accounts cannot be self-registered".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ValidateRequest for LoginRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("email", &self.email)?;
        require_non_empty("password", &self.password)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub email: String,
    pub token: String,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("You are already registered! Please login")]
    AlreadyRegistered,

    #[error("You are not registered, Please register!")]
    NotRegistered,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Token(String),

    #[error(transparent)]
    Store(#[from] shared_database::StoreError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AlreadyRegistered => AppError::Conflict(err.to_string()),
            AuthError::NotRegistered | AuthError::InvalidCredentials => AppError::BadRequest(err.to_string()),
            AuthError::Hashing(_) | AuthError::Token(_) => AppError::Internal(err.to_string()),
            AuthError::Store(store_err) => store_err.into(),
        }
    }
}
