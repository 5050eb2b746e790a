//! Newsletter repository

use crate::db::DatabasePool;
use crate::models::{CreateNewsletter, Newsletter, Page, PageRequest, UpdateNewsletter};
use async_trait::async_trait;
use chrono::Utc;
use mailmaster_common::types::NewsletterId;
use mailmaster_common::{Error, Result};
use uuid::Uuid;

/// Newsletter repository trait
#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    async fn create(&self, input: CreateNewsletter) -> Result<Newsletter>;
    async fn get(&self, id: NewsletterId) -> Result<Option<Newsletter>>;
    async fn list(&self, page: PageRequest) -> Result<Page<Newsletter>>;
    async fn update(&self, id: NewsletterId, input: UpdateNewsletter)
        -> Result<Option<Newsletter>>;
    async fn delete(&self, id: NewsletterId) -> Result<bool>;
}

/// Database newsletter repository
pub struct DbNewsletterRepository {
    pool: DatabasePool,
}

impl DbNewsletterRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NewsletterRepository for DbNewsletterRepository {
    async fn create(&self, input: CreateNewsletter) -> Result<Newsletter> {
        let now = Utc::now();

        sqlx::query_as::<_, Newsletter>(
            r#"
            INSERT INTO newsletters (id, title, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.title)
        .bind(&input.content)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn get(&self, id: NewsletterId) -> Result<Option<Newsletter>> {
        sqlx::query_as::<_, Newsletter>("SELECT * FROM newsletters WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Newsletter>> {
        let items = sqlx::query_as::<_, Newsletter>(
            r#"
            SELECT * FROM newsletters
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM newsletters")
            .fetch_one(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(Page { items, total })
    }

    async fn update(
        &self,
        id: NewsletterId,
        input: UpdateNewsletter,
    ) -> Result<Option<Newsletter>> {
        sqlx::query_as::<_, Newsletter>(
            r#"
            UPDATE newsletters SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.content)
        .fetch_optional(self.pool.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn delete(&self, id: NewsletterId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM newsletters WHERE id = $1")
            .bind(id)
            .execute(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}
