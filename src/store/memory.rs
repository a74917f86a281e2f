use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ChirpRecord, ChirpStore, RefreshTokenRecord, RefreshTokenStore, UserRecord, UserStore};
use crate::error::{AppError, DatabaseError};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
    // insertion order is creation order
    chirps: Vec<ChirpRecord>,
}

/// Process-local store with the same semantics as [`PgStore`](super::PgStore).
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables.lock().map_err(|_| {
            AppError::Database(DatabaseError::UnexpectedError(
                "in-memory store lock poisoned".to_string(),
            ))
        })
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<UserRecord, AppError> {
        let mut tables = self.lock()?;
        if tables.users.values().any(|u| u.email == email) {
            return Err(AppError::Database(DatabaseError::UniqueConstraintViolation(
                "Email already registered".to_string(),
            )));
        }

        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let tables = self.lock()?;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AppError> {
        let tables = self.lock()?;
        Ok(tables.users.get(&id).cloned())
    }

    async fn delete_all_users(&self) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        tables.users.clear();
        tables.refresh_tokens.clear();
        tables.chirps.clear();
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryStore {
    async fn insert_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        if !tables.users.contains_key(&record.user_id) {
            return Err(AppError::Database(DatabaseError::UnexpectedError(
                "refresh token owner does not exist".to_string(),
            )));
        }
        if tables.refresh_tokens.contains_key(&record.token) {
            return Err(AppError::Database(DatabaseError::UniqueConstraintViolation(
                "Refresh token already exists".to_string(),
            )));
        }
        tables.refresh_tokens.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AppError> {
        let tables = self.lock()?;
        Ok(tables.refresh_tokens.get(token).cloned())
    }

    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        let record = tables.refresh_tokens.get_mut(token).ok_or_else(|| {
            AppError::Database(DatabaseError::NotFound("refresh token".to_string()))
        })?;
        record.revoked_at.get_or_insert(at);
        record.updated_at = at;
        Ok(())
    }
}

#[async_trait]
impl ChirpStore for InMemoryStore {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<ChirpRecord, AppError> {
        let mut tables = self.lock()?;
        if !tables.users.contains_key(&user_id) {
            return Err(AppError::Database(DatabaseError::NotFound("user".to_string())));
        }

        let now = Utc::now();
        let chirp = ChirpRecord {
            id: Uuid::new_v4(),
            body: body.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn list_chirps(&self) -> Result<Vec<ChirpRecord>, AppError> {
        let tables = self.lock()?;
        Ok(tables.chirps.clone())
    }

    async fn find_chirp_by_id(&self, id: Uuid) -> Result<Option<ChirpRecord>, AppError> {
        let tables = self.lock()?;
        Ok(tables.chirps.iter().find(|c| c.id == id).cloned())
    }
}
