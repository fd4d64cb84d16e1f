use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::{Store, StoreError};
use shared_models::auth::{JwtClaims, TokenResponse};
use shared_models::user::{NewUser, User};
use shared_utils::blacklist::TokenBlacklist;
use shared_utils::jwt::{issue_token, validate_token};
use shared_utils::AppState;

use crate::models::{AuthError, LoginRequest, LoginResponse, RegisterRequest};
use crate::services::password::PasswordService;

pub struct AuthService {
    config: Arc<AppConfig>,
    store: Arc<dyn Store>,
    blacklist: Arc<TokenBlacklist>,
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            store: state.store.clone(),
            blacklist: state.blacklist.clone(),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let email = request.email.trim().to_lowercase();
        let role = request.resolved_role();

        if self.store.find_user_by_email(&email).await?.is_some() {
            debug!("Registration rejected, {} already exists", email);
            return Err(AuthError::AlreadyRegistered);
        }

        let password_hash = PasswordService::hash_password(&request.password)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let new_user = NewUser {
            email,
            password_hash,
            full_name: request.full_name.trim().to_string(),
            role,
            dob: request.dob,
            contact_no: request.contact_no,
            gender: request.gender,
        };

        // A concurrent registration can still win between the lookup and the insert.
        let user = self.store.insert_user(new_user).await.map_err(|e| match e {
            StoreError::Conflict(_) => AuthError::AlreadyRegistered,
            other => AuthError::Store(other),
        })?;

        info!("Registered user {} as {}", user.id, user.role);
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        let email = request.email.trim().to_lowercase();

        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::NotRegistered)?;

        let matches = PasswordService::verify_password(&request.password, &user.password_hash)
            .map_err(|e| {
                warn!("Stored password hash for {} is unreadable: {}", user.id, e);
                AuthError::InvalidCredentials
            })?;

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let (token, _) = issue_token(
            user.id,
            &user.email,
            &self.config.jwt_secret,
            self.config.jwt_expiry_hours,
        )
        .map_err(AuthError::Token)?;

        debug!("Issued token for {}", user.id);
        Ok(LoginResponse {
            email: user.email,
            token,
        })
    }

    pub async fn logout(&self, token: &str, claims: &JwtClaims) {
        self.blacklist.revoke(token, claims.exp).await;
        info!("Token for {} revoked until {}", claims.id, claims.exp);
    }

    /// Reports whether `token` is currently usable. Failures are `Ok` with
    /// `valid: false`, never errors.
    pub async fn check_token(&self, token: &str) -> Result<TokenResponse, AuthError> {
        if self.blacklist.is_revoked(token).await {
            return Ok(invalid_token());
        }

        let claims = match validate_token(token, &self.config.jwt_secret) {
            Ok(claims) => claims,
            Err(reason) => {
                debug!("Token rejected: {}", reason);
                return Ok(invalid_token());
            }
        };

        let user = match claims.id.parse() {
            Ok(id) => self.store.find_user_by_id(id).await?,
            Err(_) => None,
        };

        Ok(match user {
            Some(user) => TokenResponse {
                valid: true,
                user_id: user.id.to_string(),
                email: user.email,
                role: Some(user.role),
            },
            None => invalid_token(),
        })
    }
}

fn invalid_token() -> TokenResponse {
    TokenResponse {
        valid: false,
        user_id: String::new(),
        email: String::new(),
        role: None,
    }
}
