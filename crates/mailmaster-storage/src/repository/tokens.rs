//! Personal access token repository

use crate::db::DatabasePool;
use crate::models::PersonalAccessToken;
use async_trait::async_trait;
use chrono::Utc;
use mailmaster_common::types::{TokenId, UserId};
use mailmaster_common::{Error, Result};
use uuid::Uuid;

/// Token repository trait
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Store a token hash for a user
    async fn create(&self, user_id: UserId, name: &str, token_hash: &str)
        -> Result<PersonalAccessToken>;

    /// Find a token by the SHA-256 hex digest of its plaintext
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<PersonalAccessToken>>;

    /// Update last_used_at timestamp
    async fn touch(&self, id: TokenId) -> Result<()>;

    /// Delete every token of a user, returning how many were removed
    async fn delete_for_user(&self, user_id: UserId) -> Result<u64>;
}

/// Database token repository
pub struct DbTokenRepository {
    pool: DatabasePool,
}

impl DbTokenRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for DbTokenRepository {
    async fn create(
        &self,
        user_id: UserId,
        name: &str,
        token_hash: &str,
    ) -> Result<PersonalAccessToken> {
        sqlx::query_as::<_, PersonalAccessToken>(
            r#"
            INSERT INTO personal_access_tokens (id, user_id, name, token_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(name)
        .bind(token_hash)
        .bind(Utc::now())
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<PersonalAccessToken>> {
        sqlx::query_as::<_, PersonalAccessToken>(
            "SELECT * FROM personal_access_tokens WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(self.pool.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn touch(&self, id: TokenId) -> Result<()> {
        sqlx::query("UPDATE personal_access_tokens SET last_used_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete_for_user(&self, user_id: UserId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM personal_access_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
