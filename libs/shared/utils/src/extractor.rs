use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::user::Role;

use crate::jwt::validate_token;
use crate::state::AppState;

/// Resolves the bearer token to a live user and stores [`AuthUser`] and the
/// token's claims in the request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?.to_string();

    if state.blacklist.is_revoked(&token).await {
        return Err(AppError::Auth("Token is blacklisted".to_string()));
    }

    let claims = validate_token(&token, &state.config.jwt_secret).map_err(AppError::Auth)?;

    let user_id = Uuid::parse_str(&claims.id)
        .map_err(|_| AppError::Auth("Invalid token subject".to_string()))?;

    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

    debug!("Authenticated {} as {}", user.id, user.role);

    request.extensions_mut().insert(AuthUser::from(&user));
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    auth_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))
}

/// Fails with `Forbidden` unless the caller holds one of `allowed`.
pub fn ensure_role(user: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        return Ok(());
    }

    let names: Vec<String> = allowed.iter().map(ToString::to_string).collect();
    Err(AppError::Forbidden(format!(
        "Access denied: requires role {}",
        names.join(" or ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "u@example.com".to_string(),
            full_name: "U".to_string(),
            role,
        }
    }

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_or_non_bearer_header() {
        assert_matches!(bearer_token(&HeaderMap::new()), Err(AppError::Auth(_)));

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_matches!(bearer_token(&headers), Err(AppError::Auth(_)));
    }

    #[test]
    fn role_guard() {
        assert!(ensure_role(&user(Role::Patient), &[Role::Patient]).is_ok());
        assert_matches!(
            ensure_role(&user(Role::Doctor), &[Role::Patient]),
            Err(AppError::Forbidden(msg)) if msg.contains("PATIENT")
        );
    }
}
