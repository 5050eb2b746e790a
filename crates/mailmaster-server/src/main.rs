//! MailMaster - Newsletter backend entry point

use anyhow::{Context, Result};
use mailmaster_api::AppState;
use mailmaster_common::config::{Config, LoggingConfig};
use mailmaster_core::{mailer_from_config, seed_demo_users, AccountService};
use mailmaster_storage::Store;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting MailMaster...");

    // Initialize storage
    let store = Store::connect(&config.database).await?;
    info!(backend = %config.database.backend, "Storage ready");

    if config.seed.enabled {
        let accounts = AccountService::new(store.clone());
        let created = seed_demo_users(&accounts, &config.seed.password).await?;
        info!(created, "Demo users seeded");
    }

    // Outgoing mail
    let mailer = mailer_from_config(&config.mail)?;
    info!(transport = %config.mail.transport, "Mailer configured");

    let state = AppState::new(store, mailer, config.api.public_url.clone());
    let app = mailmaster_api::create_router(state, &config.api.cors_origins);

    let addr = format!("{}:{}", config.server.bind_address, config.api.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind API server on {}", addr))?;
    info!("Starting API server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("MailMaster shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},mailmaster={}", config.level, config.level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(fmt::layer().json().with_target(true).with_level(true))
            .init();
    } else {
        registry
            .with(fmt::layer().pretty().with_target(true).with_level(true))
            .init();
    }
}
