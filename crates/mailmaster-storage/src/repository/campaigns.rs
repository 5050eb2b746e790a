//! Campaign repository

use crate::db::{map_foreign_key_violation, DatabasePool};
use crate::models::{Campaign, CreateCampaign, Page, PageRequest, UpdateCampaign};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mailmaster_common::types::{CampaignId, CampaignStatus};
use mailmaster_common::{Error, Result};
use uuid::Uuid;

/// Campaign repository trait
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    async fn create(&self, input: CreateCampaign) -> Result<Campaign>;
    async fn get(&self, id: CampaignId) -> Result<Option<Campaign>>;
    async fn list(&self, page: PageRequest) -> Result<Page<Campaign>>;
    async fn update(&self, id: CampaignId, input: UpdateCampaign) -> Result<Option<Campaign>>;
    async fn delete(&self, id: CampaignId) -> Result<bool>;

    /// Move a campaign to `pending` and stamp `sent_at`
    async fn mark_pending(&self, id: CampaignId, sent_at: DateTime<Utc>)
        -> Result<Option<Campaign>>;
}

/// Database campaign repository
pub struct DbCampaignRepository {
    pool: DatabasePool,
}

impl DbCampaignRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CampaignRepository for DbCampaignRepository {
    async fn create(&self, input: CreateCampaign) -> Result<Campaign> {
        let now = Utc::now();

        sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO campaigns (
                id, newsletter_id, title, subject, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.newsletter_id)
        .bind(&input.title)
        .bind(&input.subject)
        .bind(input.status.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| map_foreign_key_violation(e, "newsletter_id"))
    }

    async fn get(&self, id: CampaignId) -> Result<Option<Campaign>> {
        sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Campaign>> {
        let items = sqlx::query_as::<_, Campaign>(
            r#"
            SELECT * FROM campaigns
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM campaigns")
            .fetch_one(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(Page { items, total })
    }

    async fn update(&self, id: CampaignId, input: UpdateCampaign) -> Result<Option<Campaign>> {
        sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE campaigns SET
                newsletter_id = COALESCE($2, newsletter_id),
                title = COALESCE($3, title),
                subject = COALESCE($4, subject),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.newsletter_id)
        .bind(&input.title)
        .bind(&input.subject)
        .bind(input.status.map(|s| s.as_str()))
        .fetch_optional(self.pool.pool())
        .await
        .map_err(|e| map_foreign_key_violation(e, "newsletter_id"))
    }

    async fn delete(&self, id: CampaignId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_pending(
        &self,
        id: CampaignId,
        sent_at: DateTime<Utc>,
    ) -> Result<Option<Campaign>> {
        sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE campaigns SET
                status = $2,
                sent_at = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(CampaignStatus::Pending.as_str())
        .bind(sent_at)
        .fetch_optional(self.pool.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }
}
