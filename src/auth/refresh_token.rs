/// Refresh Token Management
///
/// Handles refresh token generation, storage, validation, and revocation.
/// Refresh tokens are:
/// - 32 bytes from the OS CSPRNG, hex-encoded (64 characters)
/// - Bound to exactly one user, with an expiry independent of access tokens
/// - Active until they expire or are revoked; both end states are terminal
///
/// Expiry is evaluated lazily on lookup. There is no background sweep and
/// no rotation: renewing an access token leaves the refresh token untouched.

use chrono::{Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use crate::error::{AppError, CryptoError, DatabaseError, RefreshTokenError};
use crate::store::{RefreshTokenRecord, RefreshTokenState, RefreshTokenStore};

const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new cryptographically secure refresh token
///
/// # Errors
/// Returns `RandomnessUnavailable` if the OS random source fails
pub fn generate_refresh_token() -> Result<String, AppError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::Crypto(CryptoError::RandomnessUnavailable(e.to_string())))?;
    Ok(hex::encode(bytes))
}

/// Save a refresh token for a user
///
/// # Arguments
/// * `store` - Refresh token store
/// * `user_id` - User ID that owns this token
/// * `token` - Plaintext refresh token
/// * `ttl` - Token lifetime from now
///
/// # Errors
/// Returns error if the store rejects the insert
pub async fn save_refresh_token(
    store: &dyn RefreshTokenStore,
    user_id: Uuid,
    token: &str,
    ttl: Duration,
) -> Result<RefreshTokenRecord, AppError> {
    let now = Utc::now();
    let record = RefreshTokenRecord {
        token: token.to_string(),
        user_id,
        created_at: now,
        updated_at: now,
        expires_at: now + ttl,
        revoked_at: None,
    };

    store.insert_refresh_token(&record).await?;

    tracing::debug!(user_id = %user_id, expires_at = %record.expires_at, "Refresh token recorded");
    Ok(record)
}

/// Validate a refresh token for access token renewal
///
/// # Returns
/// User ID associated with the token if it is still active
///
/// # Errors
/// `NotFound`, `Expired` or `Revoked`, checked in that order
pub async fn validate_refresh_token(
    store: &dyn RefreshTokenStore,
    token: &str,
) -> Result<Uuid, AppError> {
    let record = lookup(store, token).await?;

    match record.state(Utc::now()) {
        RefreshTokenState::Active => Ok(record.user_id),
        RefreshTokenState::Expired => {
            tracing::info!(user_id = %record.user_id, "Refresh token expired");
            Err(AppError::RefreshToken(RefreshTokenError::Expired))
        }
        RefreshTokenState::Revoked => {
            tracing::warn!(user_id = %record.user_id, "Attempt to use revoked refresh token");
            Err(AppError::RefreshToken(RefreshTokenError::Revoked))
        }
    }
}

/// Revoke a single refresh token
///
/// Expiry is checked before revocation, so revoking an expired token
/// reports `Expired`. Revoking an already revoked token succeeds.
///
/// # Errors
/// `NotFound` or `Expired`, or a store failure
pub async fn revoke_refresh_token(store: &dyn RefreshTokenStore, token: &str) -> Result<(), AppError> {
    let record = lookup(store, token).await?;
    let now = Utc::now();

    if record.state(now) == RefreshTokenState::Expired {
        tracing::info!(user_id = %record.user_id, "Refusing to revoke expired refresh token");
        return Err(AppError::RefreshToken(RefreshTokenError::Expired));
    }

    store.mark_revoked(token, now).await.map_err(|e| match e {
        // Deleted between lookup and update
        AppError::Database(DatabaseError::NotFound(_)) => {
            AppError::RefreshToken(RefreshTokenError::NotFound)
        }
        other => other,
    })?;

    tracing::info!(user_id = %record.user_id, "Refresh token revoked");
    Ok(())
}

async fn lookup(store: &dyn RefreshTokenStore, token: &str) -> Result<RefreshTokenRecord, AppError> {
    store.find_refresh_token(token).await?.ok_or_else(|| {
        tracing::warn!("Refresh token not found");
        AppError::RefreshToken(RefreshTokenError::NotFound)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, UserStore};

    async fn store_with_user() -> (InMemoryStore, Uuid) {
        let store = InMemoryStore::new();
        let user = store
            .create_user("user@example.com", "$2b$04$unused")
            .await
            .unwrap();
        (store, user.id)
    }

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token().unwrap();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generated_tokens_differ() {
        let first = generate_refresh_token().unwrap();
        let second = generate_refresh_token().unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_saved_token_is_active() {
        let (store, user_id) = store_with_user().await;
        let token = generate_refresh_token().unwrap();

        let record = save_refresh_token(&store, user_id, &token, Duration::days(60))
            .await
            .unwrap();

        assert!(record.revoked_at.is_none());
        assert_eq!(record.expires_at - record.created_at, Duration::days(60));
        assert_eq!(validate_refresh_token(&store, &token).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let (store, _) = store_with_user().await;

        let result = validate_refresh_token(&store, "deadbeef").await;
        assert!(matches!(
            result,
            Err(AppError::RefreshToken(RefreshTokenError::NotFound))
        ));
    }

    #[tokio::test]
    async fn test_expired_token_without_revocation() {
        let (store, user_id) = store_with_user().await;
        let token = generate_refresh_token().unwrap();
        save_refresh_token(&store, user_id, &token, Duration::seconds(-1))
            .await
            .unwrap();

        let result = validate_refresh_token(&store, &token).await;
        assert!(matches!(
            result,
            Err(AppError::RefreshToken(RefreshTokenError::Expired))
        ));
    }

    #[tokio::test]
    async fn test_revoked_token_before_expiry() {
        let (store, user_id) = store_with_user().await;
        let token = generate_refresh_token().unwrap();
        save_refresh_token(&store, user_id, &token, Duration::days(60))
            .await
            .unwrap();

        revoke_refresh_token(&store, &token).await.unwrap();

        let result = validate_refresh_token(&store, &token).await;
        assert!(matches!(
            result,
            Err(AppError::RefreshToken(RefreshTokenError::Revoked))
        ));
    }

    #[tokio::test]
    async fn test_revoke_twice_succeeds() {
        let (store, user_id) = store_with_user().await;
        let token = generate_refresh_token().unwrap();
        save_refresh_token(&store, user_id, &token, Duration::days(60))
            .await
            .unwrap();

        revoke_refresh_token(&store, &token).await.unwrap();
        let first = store.find_refresh_token(&token).await.unwrap().unwrap().revoked_at;

        revoke_refresh_token(&store, &token).await.unwrap();
        let second = store.find_refresh_token(&token).await.unwrap().unwrap().revoked_at;

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_revoke_expired_reports_expired() {
        let (store, user_id) = store_with_user().await;
        let token = generate_refresh_token().unwrap();
        save_refresh_token(&store, user_id, &token, Duration::seconds(-1))
            .await
            .unwrap();

        let result = revoke_refresh_token(&store, &token).await;
        assert!(matches!(
            result,
            Err(AppError::RefreshToken(RefreshTokenError::Expired))
        ));

        // Nothing was recorded
        let stored = store.find_refresh_token(&token).await.unwrap().unwrap();
        assert!(stored.revoked_at.is_none());
    }

    #[tokio::test]
    async fn test_revoke_unknown_token() {
        let (store, _) = store_with_user().await;

        let result = revoke_refresh_token(&store, "deadbeef").await;
        assert!(matches!(
            result,
            Err(AppError::RefreshToken(RefreshTokenError::NotFound))
        ));
    }
}
