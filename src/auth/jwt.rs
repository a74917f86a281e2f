/// JWT Token Generation and Validation
///
/// Access tokens are compact HS256 JWS strings keyed by the static signing
/// secret. They are never stored server side.

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::error::{AppError, AuthError, CryptoError};

/// Generate a new access token for a user
///
/// # Arguments
/// * `user_id` - User's UUID, stored as the subject
/// * `secret` - HS256 signing secret
/// * `ttl` - Lifetime of the token from now
///
/// # Errors
/// Returns error if token signing fails
pub fn make_access_token(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, AppError> {
    sign_claims(&Claims::new(user_id, ttl), secret)
}

pub(crate) fn sign_claims(claims: &Claims, secret: &str) -> Result<String, AppError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Crypto(CryptoError::SigningFailure(e.to_string())))
}

/// Validate an access token and return its subject
///
/// The issuer claim must be present but its value is not compared with
/// [`ISSUER`](crate::auth::ISSUER).
///
/// # Errors
/// Returns `TokenExpired` for an expired token and `TokenInvalid` when the
/// token is malformed, tampered with, signed with another secret, lacks a
/// required claim or carries a subject that is not a UUID.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::warn!("JWT validation error: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::Auth(AuthError::TokenExpired),
            _ => AppError::Auth(AuthError::TokenInvalid),
        }
    })?;

    data.claims.user_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::ISSUER;
    use chrono::Utc;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    #[test]
    fn test_generate_and_validate_token() {
        let user_id = Uuid::new_v4();

        let token = make_access_token(user_id, SECRET, Duration::hours(1))
            .expect("Failed to generate token");
        let validated = validate_access_token(&token, SECRET).expect("Failed to validate token");

        assert_eq!(validated, user_id);
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_invalid_token() {
        let result = validate_access_token("invalid.token.string", SECRET);

        assert!(matches!(result, Err(AppError::Auth(AuthError::TokenInvalid))));
    }

    #[test]
    fn test_wrong_secret() {
        let token = make_access_token(Uuid::new_v4(), SECRET, Duration::hours(1))
            .expect("Failed to generate token");

        let result = validate_access_token(&token, "wrong_secret");

        assert!(matches!(result, Err(AppError::Auth(AuthError::TokenInvalid))));
    }

    #[test]
    fn test_expired_token() {
        // Past the default leeway
        let issued = Utc::now() - Duration::hours(2);
        let claims = Claims::issued_at(Uuid::new_v4(), issued, Duration::hours(1));
        let token = sign_claims(&claims, SECRET).expect("Failed to generate token");

        let result = validate_access_token(&token, SECRET);

        assert!(matches!(result, Err(AppError::Auth(AuthError::TokenExpired))));
    }

    #[test]
    fn test_tampered_payload() {
        let token = make_access_token(Uuid::new_v4(), SECRET, Duration::hours(1))
            .expect("Failed to generate token");

        let mut segments: Vec<String> = token.split('.').map(str::to_string).collect();
        let other = make_access_token(Uuid::new_v4(), SECRET, Duration::hours(1))
            .expect("Failed to generate token");
        segments[1] = other.split('.').nth(1).unwrap().to_string();
        let tampered = segments.join(".");

        let result = validate_access_token(&tampered, SECRET);

        assert!(matches!(result, Err(AppError::Auth(AuthError::TokenInvalid))));
    }

    #[test]
    fn test_tampered_signature() {
        let token = make_access_token(Uuid::new_v4(), SECRET, Duration::hours(1))
            .expect("Failed to generate token");

        let tampered = format!("{}X", token);

        assert!(validate_access_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_non_uuid_subject() {
        let mut claims = Claims::new(Uuid::new_v4(), Duration::hours(1));
        claims.sub = "not-a-uuid".to_string();
        let token = sign_claims(&claims, SECRET).expect("Failed to generate token");

        let result = validate_access_token(&token, SECRET);

        assert!(matches!(result, Err(AppError::Auth(AuthError::TokenInvalid))));
    }

    #[test]
    fn test_missing_issuer_is_rejected() {
        #[derive(serde::Serialize)]
        struct NoIssuer {
            sub: String,
            iat: i64,
            exp: i64,
        }

        let now = Utc::now().timestamp();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoIssuer {
                sub: Uuid::new_v4().to_string(),
                iat: now,
                exp: now + 3600,
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = validate_access_token(&token, SECRET);

        assert!(matches!(result, Err(AppError::Auth(AuthError::TokenInvalid))));
    }

    #[test]
    fn test_missing_issued_at_is_accepted() {
        #[derive(serde::Serialize)]
        struct NoIssuedAt {
            iss: String,
            sub: String,
            exp: i64,
        }

        let user_id = Uuid::new_v4();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoIssuedAt {
                iss: ISSUER.to_string(),
                sub: user_id.to_string(),
                exp: Utc::now().timestamp() + 3600,
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(validate_access_token(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_issued_tokens_carry_issued_at() {
        let token = make_access_token(Uuid::new_v4(), SECRET, Duration::hours(1))
            .expect("Failed to generate token");

        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(&token, &DecodingKey::from_secret(SECRET.as_bytes()), &validation)
            .expect("Failed to decode token");

        assert!(data.claims.iat.is_some());
    }

    #[test]
    fn test_foreign_issuer_is_accepted() {
        let user_id = Uuid::new_v4();
        let mut claims = Claims::new(user_id, Duration::hours(1));
        claims.iss = format!("not-{}", ISSUER);
        let token = sign_claims(&claims, SECRET).expect("Failed to generate token");

        assert_eq!(validate_access_token(&token, SECRET).unwrap(), user_id);
    }
}
