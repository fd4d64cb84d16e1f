use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use doctor_cell::parse_consultation_timing;
use doctor_cell::services::catalogue::find_specialization;
use shared_models::error::AppError;
use shared_models::profile::{BloodGroup, DoctorProfile, PatientProfile};
use shared_utils::validation::{require_non_empty, require_range};

use crate::models::{
    ProfileError, ProfileForm, UploadedImage, ALLOWED_IMAGE_TYPES, MAX_IMAGE_BYTES, PROFILE_IMAGE_FIELD,
};

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ProfileError::ImageTooLarge.into()
    } else {
        AppError::ValidationError(err.body_text())
    }
}

/// Drains a multipart body into text fields and at most one profile image.
/// Repeated text fields are joined with commas.
pub async fn read_profile_form(mut multipart: Multipart) -> Result<ProfileForm, AppError> {
    let mut form = ProfileForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        if file_name.is_none() && name != PROFILE_IMAGE_FIELD {
            let value = field.text().await.map_err(multipart_error)?;
            form.fields
                .entry(name)
                .and_modify(|existing| {
                    existing.push(',');
                    existing.push_str(&value);
                })
                .or_insert(value);
            continue;
        }

        if name != PROFILE_IMAGE_FIELD {
            return Err(AppError::ValidationError(format!("Unexpected file field {}", name)));
        }

        let content_type = field.content_type().unwrap_or_default().to_ascii_lowercase();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        // Browsers send an empty part when no file was picked.
        if bytes.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
            continue;
        }
        if form.image.is_some() {
            return Err(AppError::ValidationError("Only one profile image can be uploaded".to_string()));
        }
        if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(ProfileError::UnsupportedImageType.into());
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ProfileError::ImageTooLarge.into());
        }

        debug!("Received profile image of {} bytes", bytes.len());
        form.image = Some(UploadedImage {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Ok(form)
}

struct Fields<'a>(&'a HashMap<String, String>);

impl<'a> Fields<'a> {
    fn optional(&self, key: &str) -> Option<&'a str> {
        self.0.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<&'a str, AppError> {
        let value = self.optional(key).unwrap_or_default();
        require_non_empty(key, value)?;
        Ok(value)
    }

    fn parsed<T: FromStr>(&self, key: &str, kind: &str) -> Result<Option<T>, AppError> {
        self.optional(key)
            .map(|v| {
                v.parse::<T>()
                    .map_err(|_| AppError::ValidationError(format!("{} must be {}", key, kind)))
            })
            .transpose()
    }

    fn required_parsed<T: FromStr>(&self, key: &str, kind: &str) -> Result<T, AppError> {
        self.required(key)?;
        self.parsed(key, kind)?
            .ok_or_else(|| AppError::ValidationError(format!("{} is required", key)))
    }

    fn list(&self, key: &str) -> Vec<String> {
        self.optional(key)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn text(&self, key: &str) -> Option<String> {
        self.optional(key).map(str::to_string)
    }
}

pub fn build_doctor_profile(
    user_id: Uuid,
    fields: &HashMap<String, String>,
    profile_image: Option<String>,
    now: DateTime<Utc>,
) -> Result<DoctorProfile, AppError> {
    let f = Fields(fields);

    let age: u32 = f.required_parsed("age", "a whole number")?;
    require_range("age", age, 18, 100)?;
    let experience: u32 = f.required_parsed("experience", "a whole number")?;
    require_range("experience", experience, 0, 50)?;

    let specialization_key = if f.optional("specialization").is_some() {
        "specialization"
    } else {
        "specialized"
    };
    let specialization = find_specialization(f.required(specialization_key)?)
        .ok_or_else(|| AppError::ValidationError("specialization must be one of the doctor types".to_string()))?;

    let consultation_timing = f.required("consultationTiming")?;
    parse_consultation_timing(consultation_timing)?;

    let consultation_fee: Option<f64> = f.parsed("consultationFee", "a number")?;
    if let Some(fee) = consultation_fee {
        if fee < 0.0 {
            return Err(AppError::ValidationError("consultationFee must not be negative".to_string()));
        }
    }

    Ok(DoctorProfile {
        user_id,
        name: f.required("name")?.to_string(),
        age,
        contact_number: f.required("contactNumber")?.to_string(),
        address: f.required("address")?.to_string(),
        specialization: specialization.title.to_string(),
        experience,
        consultation_timing: consultation_timing.to_string(),
        license_number: f.text("licenseNumber"),
        education: f.text("education"),
        certifications: f.list("certifications"),
        languages: f.list("languages"),
        consultation_fee,
        is_available: f.parsed::<bool>("isAvailable", "true or false")?.unwrap_or(true),
        profile_image,
        created_at: now,
        updated_at: now,
    })
}

pub fn build_patient_profile(
    user_id: Uuid,
    fields: &HashMap<String, String>,
    profile_image: Option<String>,
    now: DateTime<Utc>,
) -> Result<PatientProfile, AppError> {
    let f = Fields(fields);

    let age: u32 = f.required_parsed("age", "a whole number")?;
    require_range("age", age, 0, 120)?;
    let weight: f64 = f.required_parsed("weight", "a number")?;
    require_range("weight", weight, 1.0, 500.0)?;
    let height: f64 = f.required_parsed("height", "a number")?;
    require_range("height", height, 50.0, 250.0)?;
    let blood_group: BloodGroup = f.required_parsed("bloodGroup", "one of A+, A-, B+, B-, AB+, AB-, O+, O-")?;

    Ok(PatientProfile {
        user_id,
        name: f.required("name")?.to_string(),
        age,
        contact_number: f.required("contactNumber")?.to_string(),
        address: f.required("address")?.to_string(),
        blood_group,
        weight,
        height,
        ongoing_treatment: f.text("ongoingTreatment"),
        health_issues: f.list("healthIssues"),
        allergies: f.list("allergies"),
        profile_image,
        created_at: now,
        updated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn doctor_fields() -> HashMap<String, String> {
        fields(&[
            ("name", "Dr. House"),
            ("age", "45"),
            ("contactNumber", "555-0101"),
            ("address", "221B Baker Street"),
            ("specialization", "neurologist"),
            ("experience", "20"),
            ("consultationTiming", "9AM-5PM"),
            ("languages", "English, Spanish"),
        ])
    }

    #[test]
    fn doctor_profile_uses_catalogue_title() {
        let profile = build_doctor_profile(Uuid::new_v4(), &doctor_fields(), None, Utc::now()).unwrap();
        assert_eq!(profile.specialization, "Neurologist");
        assert_eq!(profile.languages, vec!["English", "Spanish"]);
        assert!(profile.is_available);
        assert_eq!(profile.consultation_fee, None);
    }

    #[test]
    fn doctor_profile_accepts_legacy_specialized_field() {
        let mut f = doctor_fields();
        f.remove("specialization");
        f.insert("specialized".to_string(), "Cardiologist".to_string());
        let profile = build_doctor_profile(Uuid::new_v4(), &f, None, Utc::now()).unwrap();
        assert_eq!(profile.specialization, "Cardiologist");
    }

    #[test]
    fn doctor_profile_rejects_bad_values() {
        let mut f = doctor_fields();
        f.insert("age".to_string(), "17".to_string());
        assert_matches!(
            build_doctor_profile(Uuid::new_v4(), &f, None, Utc::now()),
            Err(AppError::ValidationError(msg)) if msg == "age must be between 18 and 100"
        );

        let mut f = doctor_fields();
        f.insert("consultationTiming".to_string(), "whenever".to_string());
        assert_matches!(
            build_doctor_profile(Uuid::new_v4(), &f, None, Utc::now()),
            Err(AppError::ValidationError(_))
        );

        let mut f = doctor_fields();
        f.remove("address");
        assert_matches!(
            build_doctor_profile(Uuid::new_v4(), &f, None, Utc::now()),
            Err(AppError::ValidationError(msg)) if msg == "address is required"
        );
    }

    #[test]
    fn patient_profile_parses_lists_and_blood_group() {
        let f = fields(&[
            ("name", "Jane"),
            ("age", "30"),
            ("contactNumber", "555-0199"),
            ("address", "Main St"),
            ("bloodGroup", "o+"),
            ("weight", "61.5"),
            ("height", "170"),
            ("allergies", "pollen,peanuts"),
        ]);
        let profile = build_patient_profile(Uuid::new_v4(), &f, Some("img".to_string()), Utc::now()).unwrap();
        assert_eq!(profile.blood_group, BloodGroup::OPositive);
        assert_eq!(profile.allergies, vec!["pollen", "peanuts"]);
        assert!(profile.health_issues.is_empty());
        assert_eq!(profile.profile_image.as_deref(), Some("img"));
    }

    #[test]
    fn patient_profile_checks_ranges() {
        let f = fields(&[
            ("name", "Jane"),
            ("age", "30"),
            ("contactNumber", "555-0199"),
            ("address", "Main St"),
            ("bloodGroup", "O+"),
            ("weight", "0"),
            ("height", "170"),
        ]);
        assert_matches!(
            build_patient_profile(Uuid::new_v4(), &f, None, Utc::now()),
            Err(AppError::ValidationError(msg)) if msg.starts_with("weight must be between")
        );
    }
}
