use std::collections::HashMap;

use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;

pub const PROFILE_IMAGE_FIELD: &str = "profileImage";
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            _ => "jpg",
        }
    }
}

/// Text fields and the optional image of a profile update form.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub fields: HashMap<String, String>,
    pub image: Option<UploadedImage>,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to write image: {0}")]
    Io(String),

    #[error("Image upload failed: {0}")]
    Upload(String),
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("User not found")]
    UserNotFound,

    #[error("Admins do not have a profile")]
    AdminHasNoProfile,

    #[error("File size should be maximum 10 MB")]
    ImageTooLarge,

    #[error("File type is not supported")]
    UnsupportedImageType,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(msg) => AppError::Internal(msg),
            StorageError::Upload(msg) => AppError::ExternalService(format!("Image upload failed: {}", msg)),
        }
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::UserNotFound => AppError::NotFound(err.to_string()),
            ProfileError::AdminHasNoProfile => AppError::Forbidden(err.to_string()),
            ProfileError::ImageTooLarge | ProfileError::UnsupportedImageType => {
                AppError::ValidationError(err.to_string())
            }
            ProfileError::Storage(e) => e.into(),
            ProfileError::Store(e) => e.into(),
        }
    }
}
