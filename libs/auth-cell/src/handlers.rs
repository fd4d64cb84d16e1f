use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::HeaderMap,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use tracing::debug;

use shared_models::auth::{AuthUser, JwtClaims, TokenResponse};
use shared_models::error::AppError;
use shared_models::response::ApiResponse;
use shared_utils::extractor::bearer_token;
use shared_utils::validation::ValidatedJson;
use shared_utils::AppState;

use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::services::auth::AuthService;

pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<ApiResponse<RegisterResponse>, AppError> {
    let user = AuthService::new(&state).register(request).await?;

    Ok(ApiResponse::ok(
        RegisterResponse { email: user.email },
        "You are registered successfully",
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let response = AuthService::new(&state).login(request).await?;
    Ok(ApiResponse::ok(response, "Login successful!"))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Extension(claims): Extension<JwtClaims>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<ApiResponse<()>, AppError> {
    debug!("Logging out {}", user.id);
    AuthService::new(&state).logout(auth.token(), &claims).await;
    Ok(ApiResponse::message("Logged out successfully"))
}

pub async fn validate_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<ApiResponse<TokenResponse>, AppError> {
    let token = bearer_token(&headers)?;
    let response = AuthService::new(&state).check_token(token).await?;

    let message = if response.valid { "Token is valid" } else { "Token is invalid" };
    Ok(ApiResponse::ok(response, message))
}
