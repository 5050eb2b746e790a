//! Repository bundle shared by the services

use crate::db::DatabasePool;
use crate::repository::{
    CampaignRepositoryTrait, DbCampaignRepository, DbNewsletterRepository,
    DbSubscriberRepository, DbTokenRepository, DbUserRepository, InMemoryRepository,
    NewsletterRepositoryTrait, SubscriberRepositoryTrait, TokenRepositoryTrait,
    UserRepositoryTrait,
};
use mailmaster_common::config::DatabaseConfig;
use mailmaster_common::{Error, Result};
use std::sync::Arc;
use tracing::info;

/// All repositories behind trait objects
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepositoryTrait>,
    pub tokens: Arc<dyn TokenRepositoryTrait>,
    pub newsletters: Arc<dyn NewsletterRepositoryTrait>,
    pub subscribers: Arc<dyn SubscriberRepositoryTrait>,
    pub campaigns: Arc<dyn CampaignRepositoryTrait>,
    pool: Option<DatabasePool>,
}

impl Store {
    /// Store backed by PostgreSQL
    pub fn postgres(pool: DatabasePool) -> Self {
        Self {
            users: Arc::new(DbUserRepository::new(pool.clone())),
            tokens: Arc::new(DbTokenRepository::new(pool.clone())),
            newsletters: Arc::new(DbNewsletterRepository::new(pool.clone())),
            subscribers: Arc::new(DbSubscriberRepository::new(pool.clone())),
            campaigns: Arc::new(DbCampaignRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Store kept in process memory
    pub fn in_memory() -> Self {
        let repo = Arc::new(InMemoryRepository::new());
        Self {
            users: repo.clone(),
            tokens: repo.clone(),
            newsletters: repo.clone(),
            subscribers: repo.clone(),
            campaigns: repo,
            pool: None,
        }
    }

    /// Build a store from configuration, running migrations when enabled
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        match config.backend.as_str() {
            "memory" => {
                info!("Using in-memory store, data is lost on shutdown");
                Ok(Self::in_memory())
            }
            "postgres" => {
                let pool = DatabasePool::new(config).await?;
                if config.run_migrations {
                    pool.migrate().await?;
                }
                Ok(Self::postgres(pool))
            }
            other => Err(Error::Config(format!(
                "Unknown database backend: {}",
                other
            ))),
        }
    }

    /// Check the backing database, always healthy in memory
    pub async fn health_check(&self) -> Result<()> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(()),
        }
    }
}
