use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::JwtClaims;

/// Signs an HS256 token carrying `{id, email}` for `expiry_hours`.
pub fn issue_token(
    user_id: Uuid,
    email: &str,
    jwt_secret: &str,
    expiry_hours: i64,
) -> Result<(String, JwtClaims), String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let now = Utc::now();
    let claims = JwtClaims {
        id: user_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(expiry_hours)).timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to sign token: {}", e))?;

    Ok((token, claims))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<JwtClaims, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("Token validation failed: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expired".to_string(),
            jsonwebtoken::errors::ErrorKind::InvalidSignature => "Invalid token signature".to_string(),
            _ => "Invalid token".to_string(),
        }
    })?;

    debug!("Token validated successfully for user: {}", data.claims.id);
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn issued_token_validates_to_same_subject() {
        let id = Uuid::new_v4();
        let (token, issued) = issue_token(id, "a@example.com", SECRET, 48).unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims, issued);
        assert_eq!(claims.id, id.to_string());
        assert_eq!(claims.exp - claims.iat, 48 * 3600);
    }

    #[test]
    fn rejects_foreign_signature() {
        let (token, _) = issue_token(Uuid::new_v4(), "a@example.com", SECRET, 1).unwrap();
        assert_eq!(validate_token(&token, "other").unwrap_err(), "Invalid token signature");
    }

    #[test]
    fn rejects_expired_token() {
        let (token, _) = issue_token(Uuid::new_v4(), "a@example.com", SECRET, -1).unwrap();
        assert_eq!(validate_token(&token, SECRET).unwrap_err(), "Token expired");
    }

    #[test]
    fn empty_secret_is_an_error() {
        assert!(issue_token(Uuid::new_v4(), "a@example.com", "", 1).is_err());
        assert!(validate_token("a.b.c", "").is_err());
    }
}
