use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use shared_database::Store;
use shared_models::error::AppError;
use shared_models::profile::{Profile, ProfileView};
use shared_models::user::{Role, User, UserView};

use crate::models::{ProfileError, ProfileForm};
use crate::services::form::{build_doctor_profile, build_patient_profile};
use crate::services::storage::ImageStorage;

pub struct ProfileService {
    store: Arc<dyn Store>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn load_user(&self, user_id: Uuid) -> Result<User, ProfileError> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or(ProfileError::UserNotFound)
    }

    async fn current_profile(&self, user: &User) -> Result<Option<Profile>, ProfileError> {
        let profile = match user.role {
            Role::Doctor => self.store.get_doctor_profile(user.id).await?.map(Profile::Doctor),
            Role::Patient => self.store.get_patient_profile(user.id).await?.map(Profile::Patient),
            Role::Admin => None,
        };
        Ok(profile)
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: Uuid) -> Result<ProfileView, ProfileError> {
        let user = self.load_user(user_id).await?;
        let profile = self.current_profile(&user).await?;
        debug!("Profile for {} present: {}", user_id, profile.is_some());

        Ok(ProfileView {
            user: UserView::from(&user),
            profile,
        })
    }

    /// Validates the form for the caller's role, stores any new image and
    /// upserts the profile.
    #[instrument(skip(self, form, storage))]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        form: ProfileForm,
        storage: &dyn ImageStorage,
    ) -> Result<ProfileView, AppError> {
        let user = self.load_user(user_id).await?;
        if user.role == Role::Admin {
            return Err(ProfileError::AdminHasNoProfile.into());
        }

        let existing_image = self
            .current_profile(&user)
            .await?
            .and_then(|p| p.profile_image().map(str::to_string));
        let now = Utc::now();

        // Validate first; a rejected form must not leave an image behind.
        let profile = match user.role {
            Role::Doctor => Profile::Doctor(build_doctor_profile(user.id, &form.fields, existing_image, now)?),
            _ => Profile::Patient(build_patient_profile(user.id, &form.fields, existing_image, now)?),
        };

        let image_url = match &form.image {
            Some(image) => Some(storage.store(user.id, image).await.map_err(ProfileError::from)?),
            None => None,
        };

        let saved = match profile {
            Profile::Doctor(mut doctor) => {
                if image_url.is_some() {
                    doctor.profile_image = image_url;
                }
                Profile::Doctor(self.store.upsert_doctor_profile(doctor).await?)
            }
            Profile::Patient(mut patient) => {
                if image_url.is_some() {
                    patient.profile_image = image_url;
                }
                Profile::Patient(self.store.upsert_patient_profile(patient).await?)
            }
        };

        info!("Updated {} profile for {}", user.role, user.id);
        Ok(ProfileView {
            user: UserView::from(&user),
            profile: Some(saved),
        })
    }
}
