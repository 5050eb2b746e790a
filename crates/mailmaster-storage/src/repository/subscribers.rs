//! Subscriber repository

use crate::db::{map_unique_violation, DatabasePool};
use crate::models::{CreateSubscriber, Page, PageRequest, Subscriber, UpdateSubscriber};
use async_trait::async_trait;
use chrono::Utc;
use mailmaster_common::types::SubscriberId;
use mailmaster_common::{Error, Result};
use uuid::Uuid;

const EMAIL_CONSTRAINT: &str = "subscribers_email_key";

/// Subscriber repository trait
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    async fn create(&self, input: CreateSubscriber) -> Result<Subscriber>;
    async fn get(&self, id: SubscriberId) -> Result<Option<Subscriber>>;
    async fn get_by_email(&self, email: &str) -> Result<Option<Subscriber>>;
    async fn list(&self, page: PageRequest) -> Result<Page<Subscriber>>;
    /// Every subscriber, unpaginated
    async fn all(&self) -> Result<Vec<Subscriber>>;
    async fn update(&self, id: SubscriberId, input: UpdateSubscriber)
        -> Result<Option<Subscriber>>;
    async fn delete(&self, id: SubscriberId) -> Result<bool>;
}

/// Database subscriber repository
pub struct DbSubscriberRepository {
    pool: DatabasePool,
}

impl DbSubscriberRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberRepository for DbSubscriberRepository {
    async fn create(&self, input: CreateSubscriber) -> Result<Subscriber> {
        let now = Utc::now();

        sqlx::query_as::<_, Subscriber>(
            r#"
            INSERT INTO subscribers (id, email, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.email)
        .bind(&input.name)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| map_unique_violation(e, EMAIL_CONSTRAINT, "email"))
    }

    async fn get(&self, id: SubscriberId) -> Result<Option<Subscriber>> {
        sqlx::query_as::<_, Subscriber>("SELECT * FROM subscribers WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Subscriber>> {
        sqlx::query_as::<_, Subscriber>("SELECT * FROM subscribers WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Subscriber>> {
        let items = sqlx::query_as::<_, Subscriber>(
            r#"
            SELECT * FROM subscribers
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscribers")
            .fetch_one(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(Page { items, total })
    }

    async fn all(&self) -> Result<Vec<Subscriber>> {
        sqlx::query_as::<_, Subscriber>("SELECT * FROM subscribers ORDER BY created_at, id")
            .fetch_all(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    async fn update(
        &self,
        id: SubscriberId,
        input: UpdateSubscriber,
    ) -> Result<Option<Subscriber>> {
        let set_name = input.name.is_some();
        let name = input.name.flatten();

        sqlx::query_as::<_, Subscriber>(
            r#"
            UPDATE subscribers SET
                email = COALESCE($2, email),
                name = CASE WHEN $3 THEN $4 ELSE name END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.email)
        .bind(set_name)
        .bind(&name)
        .fetch_optional(self.pool.pool())
        .await
        .map_err(|e| map_unique_violation(e, EMAIL_CONSTRAINT, "email"))
    }

    async fn delete(&self, id: SubscriberId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subscribers WHERE id = $1")
            .bind(id)
            .execute(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}
