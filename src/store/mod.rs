//! Persistence seams for users, refresh tokens and chirps.
//!
//! Handlers only see the [`UserStore`], [`RefreshTokenStore`] and
//! [`ChirpStore`] traits.
//! [`PgStore`] backs them with Postgres; [`InMemoryStore`] keeps everything
//! in a process-local map.

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;

/// A stored account
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored chirp
#[derive(Debug, Clone)]
pub struct ChirpRecord {
    pub id: Uuid,
    pub body: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle state of a refresh token at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Active,
    Expired,
    Revoked,
}

/// A stored refresh token
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Evaluate the lifecycle state at `now`. Expiry wins over revocation.
    pub fn state(&self, now: DateTime<Utc>) -> RefreshTokenState {
        if now >= self.expires_at {
            RefreshTokenState::Expired
        } else if self.revoked_at.is_some() {
            RefreshTokenState::Revoked
        } else {
            RefreshTokenState::Active
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account. Fails with `UniqueConstraintViolation` on a taken email.
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<UserRecord, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AppError>;

    /// Delete every account together with its refresh tokens and chirps
    async fn delete_all_users(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn insert_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AppError>;

    /// Record the revocation instant. An earlier instant is never overwritten.
    ///
    /// Fails with `DatabaseError::NotFound` if the token is unknown.
    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<(), AppError>;
}

#[async_trait]
pub trait ChirpStore: Send + Sync {
    /// Fails with `DatabaseError::NotFound` if the author does not exist.
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<ChirpRecord, AppError>;

    /// All chirps, oldest first
    async fn list_chirps(&self) -> Result<Vec<ChirpRecord>, AppError>;

    async fn find_chirp_by_id(&self, id: Uuid) -> Result<Option<ChirpRecord>, AppError>;
}
