use std::env;
use std::fs;
use std::str::FromStr;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Memory,
    Supabase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    Supabase,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub api_prefix: String,
    pub public_base_url: String,
    pub database_backend: DatabaseBackend,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub stripe_api_base: String,
    pub payment_amount_cents: i64,
    pub payment_currency: String,
    pub webhook_tolerance_secs: i64,
    pub storage_backend: StorageBackend,
    pub upload_dir: String,
    pub storage_bucket: String,
    pub default_page_limit: u32,
    pub strict_status_transitions: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let server_port = parse_or("SERVER_PORT", 3000u16);
        let supabase_url = env::var("SUPABASE_URL").unwrap_or_else(|_| {
            warn!("SUPABASE_URL not set, using empty value");
            String::new()
        });

        let database_backend = match env::var("DATABASE_BACKEND").ok().as_deref() {
            Some("memory") => DatabaseBackend::Memory,
            Some("supabase") => DatabaseBackend::Supabase,
            Some(other) => {
                warn!("Unknown DATABASE_BACKEND '{}', falling back to auto-detection", other);
                detect_database_backend(&supabase_url)
            }
            None => detect_database_backend(&supabase_url),
        };

        let storage_backend = match env::var("STORAGE_BACKEND").ok().as_deref() {
            Some("supabase") => StorageBackend::Supabase,
            Some("local") | None => StorageBackend::Local,
            Some(other) => {
                warn!("Unknown STORAGE_BACKEND '{}', using local disk", other);
                StorageBackend::Local
            }
        };

        let config = Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port,
            api_prefix: normalize_prefix(&env::var("API_PREFIX").unwrap_or_default()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", server_port)),
            database_backend,
            supabase_url,
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY").unwrap_or_else(|_| {
                warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                String::new()
            }),
            jwt_secret: load_jwt_secret(),
            jwt_expiry_hours: parse_or("JWT_EXPIRY_HOURS", 48),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").unwrap_or_else(|_| {
                warn!("STRIPE_SECRET_KEY not set, using empty value");
                String::new()
            }),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_else(|_| {
                warn!("STRIPE_WEBHOOK_SECRET not set, webhook events will be rejected");
                String::new()
            }),
            stripe_api_base: env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            payment_amount_cents: parse_or("PAYMENT_AMOUNT_CENTS", 100),
            payment_currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "usd".to_string()),
            webhook_tolerance_secs: parse_or("WEBHOOK_TOLERANCE_SECS", 300),
            storage_backend,
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "profile-images".to_string()),
            default_page_limit: parse_or("DEFAULT_PAGE_LIMIT", 10),
            strict_status_transitions: parse_or("STRICT_STATUS_TRANSITIONS", false),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        let database_ready = match self.database_backend {
            DatabaseBackend::Memory => true,
            DatabaseBackend::Supabase => {
                !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
            }
        };

        database_ready && !self.jwt_secret.is_empty()
    }

    pub fn is_payment_configured(&self) -> bool {
        !self.stripe_secret_key.is_empty()
    }
}

fn detect_database_backend(supabase_url: &str) -> DatabaseBackend {
    if supabase_url.is_empty() {
        warn!("No database configured, using the in-memory store (data is lost on restart)");
        DatabaseBackend::Memory
    } else {
        DatabaseBackend::Supabase
    }
}

/// `JWT_SECRET` wins over the key file so containers can inject the key directly.
fn load_jwt_secret() -> String {
    if let Ok(secret) = env::var("JWT_SECRET") {
        return secret;
    }

    let path = env::var("JWT_SECRET_FILE").unwrap_or_else(|_| "private.key".to_string());
    match fs::read_to_string(&path) {
        Ok(contents) => contents.trim().to_string(),
        Err(e) => {
            warn!("Could not read JWT key file {}: {}", path, e);
            String::new()
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value for {}: '{}', using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
