//! Database connection and pool management

use mailmaster_common::config::DatabaseConfig;
use mailmaster_common::{Error, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// Database pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let url = Self::build_url(config)?;

        info!(
            backend = %config.backend,
            "Connecting to database"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&url)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect: {}", e)))?;

        info!("Database connection established");

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build database URL from configuration
    fn build_url(config: &DatabaseConfig) -> Result<String> {
        match config.backend.as_str() {
            "postgres" => config
                .url
                .clone()
                .ok_or_else(|| Error::Config("Database URL required for PostgreSQL".to_string())),
            other => Err(Error::Config(format!(
                "Unsupported database backend for a connection pool: {}",
                other
            ))),
        }
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Migration failed: {}", e)))?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}

/// Map a sqlx error, turning unique violations on `constraint` into a
/// validation error on `field`
pub(crate) fn map_unique_violation(e: sqlx::Error, constraint: &str, field: &str) -> Error {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some(constraint) {
            return Error::validation(field, format!("The {} has already been taken.", field));
        }
    }
    Error::Database(e.to_string())
}

/// Map a sqlx error, turning foreign key violations into a validation
/// error on `field`
pub(crate) fn map_foreign_key_violation(e: sqlx::Error, field: &str) -> Error {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return Error::validation(
                field,
                format!("The selected {} is invalid.", field.replace('_', " ")),
            );
        }
    }
    Error::Database(e.to_string())
}
