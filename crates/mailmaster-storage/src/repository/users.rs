//! User repository

use crate::db::{map_unique_violation, DatabasePool};
use crate::models::{CreateUser, User};
use async_trait::async_trait;
use mailmaster_common::types::UserId;
use mailmaster_common::{Error, Result};
use uuid::Uuid;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, input: CreateUser) -> Result<User>;
    async fn get(&self, id: UserId) -> Result<Option<User>>;
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Database user repository
pub struct DbUserRepository {
    pool: DatabasePool,
}

impl DbUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DbUserRepository {
    async fn create(&self, input: CreateUser) -> Result<User> {
        let id = Uuid::now_v7();
        let now = chrono::Utc::now();

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.role.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| map_unique_violation(e, "users_email_key", "email"))
    }

    async fn get(&self, id: UserId) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }
}
