use std::sync::Arc;

use axum::{body::to_bytes, response::Response};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use shared_config::{AppConfig, DatabaseBackend, StorageBackend};
use shared_database::{MemoryStore, Store};
use shared_models::profile::DoctorProfile;
use shared_models::user::{NewUser, Role, User};

use crate::jwt::issue_token;
use crate::state::AppState;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub stripe_api_base: String,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub upload_dir: String,
    pub strict_status_transitions: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            stripe_api_base: "http://localhost:12111".to_string(),
            stripe_secret_key: "sk_test_123".to_string(),
            stripe_webhook_secret: "whsec_test".to_string(),
            upload_dir: std::env::temp_dir().join("telemed-test-uploads").display().to_string(),
            strict_status_transitions: false,
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            api_prefix: String::new(),
            public_base_url: "http://localhost:3000".to_string(),
            database_backend: DatabaseBackend::Memory,
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: "test-service-key".to_string(),
            jwt_secret: self.jwt_secret.clone(),
            jwt_expiry_hours: 48,
            stripe_secret_key: self.stripe_secret_key.clone(),
            stripe_webhook_secret: self.stripe_webhook_secret.clone(),
            stripe_api_base: self.stripe_api_base.clone(),
            payment_amount_cents: 100,
            payment_currency: "usd".to_string(),
            webhook_tolerance_secs: 300,
            storage_backend: StorageBackend::Local,
            upload_dir: self.upload_dir.clone(),
            storage_bucket: "profile-images".to_string(),
            default_page_limit: 10,
            strict_status_transitions: self.strict_status_transitions,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new("test@example.com", Role::Patient)
    }
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            email: email.to_string(),
            full_name: format!("Test {}", role),
            role,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, Role::Doctor)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, Role::Patient)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin)
    }

    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            email: self.email.to_lowercase(),
            password_hash: "not-a-real-hash".to_string(),
            full_name: self.full_name.clone(),
            role: self.role,
            dob: None,
            contact_no: None,
            gender: None,
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user_id: Uuid, email: &str, secret: &str, exp_hours: Option<i64>) -> String {
        issue_token(user_id, email, secret, exp_hours.unwrap_or(24))
            .map(|(token, _)| token)
            .expect("test token signing")
    }

    pub fn create_expired_token(user_id: Uuid, email: &str, secret: &str) -> String {
        Self::create_test_token(user_id, email, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user_id: Uuid, email: &str) -> String {
        Self::create_test_token(user_id, email, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// A user inserted into the test store together with a valid token.
pub struct SeededUser {
    pub user: User,
    pub token: String,
}

impl SeededUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Application state over a fresh [`MemoryStore`], with direct access to the
/// store for seeding and assertions.
pub struct TestApp {
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::with_config(TestConfig::default().to_app_config())
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(AppState::new(config, store.clone()));
        Self { state, store }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.config
    }

    pub async fn seed_user(&self, user: &TestUser) -> SeededUser {
        let user = self
            .store
            .insert_user(user.to_new_user())
            .await
            .expect("seed user");
        let token = JwtTestUtils::create_test_token(user.id, &user.email, &self.state.config.jwt_secret, None);
        SeededUser { user, token }
    }

    pub async fn seed_doctor_profile(&self, user_id: Uuid, consultation_timing: &str) -> DoctorProfile {
        self.store
            .upsert_doctor_profile(sample_doctor_profile(user_id, consultation_timing))
            .await
            .expect("seed doctor profile")
    }
}

pub fn sample_doctor_profile(user_id: Uuid, consultation_timing: &str) -> DoctorProfile {
    let now = Utc::now();
    DoctorProfile {
        user_id,
        name: "Dr. Test".to_string(),
        age: 40,
        contact_number: "555-0100".to_string(),
        address: "1 Clinic Road".to_string(),
        specialization: "General Practitioner (GP)".to_string(),
        experience: 10,
        consultation_timing: consultation_timing.to_string(),
        license_number: Some("MD123456".to_string()),
        education: None,
        certifications: vec![],
        languages: vec!["English".to_string()],
        consultation_fee: None,
        is_available: true,
        profile_image: None,
        created_at: now,
        updated_at: now,
    }
}

/// Builds a `Stripe-Signature` header value for `payload`.
pub fn stripe_signature_header(payload: &str, secret: &str, timestamp: i64) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());

    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
