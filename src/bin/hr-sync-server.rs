// ABOUTME: HR sync server binary entry point
// ABOUTME: Loads environment configuration, connects the database, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # HR Sync Server
//!
//! ```bash
//! CLIENT_ID=... CLIENT_SECRET=... \
//! REDIRECT_URL=http://localhost:8080/callback \
//! DATABASE_URL=sqlite:./data/users.db \
//! cargo run --bin hr-sync-server
//! ```
//!
//! Any configuration or database failure at startup exits non-zero.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use hr_sync_server::config::environment::ServerConfig;
use hr_sync_server::constants::{startup::DB_RETRY_DELAY_SECS, SERVICE_NAME};
use hr_sync_server::database_plugins::factory::{redact_database_url, Database};
use hr_sync_server::logging::init_logging;
use hr_sync_server::resources::ServerResources;
use hr_sync_server::server;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env().context("Invalid configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    info!(
        "Starting {SERVICE_NAME} v{} on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.host,
        config.http_port
    );
    info!(
        "Connecting to database: {}",
        redact_database_url(&config.database_url)
    );

    let database = Database::connect_with_startup_retry(
        &config.database_url,
        Duration::from_secs(DB_RETRY_DELAY_SECS),
    )
    .await
    .context("Database unavailable")?;
    info!("Database backend: {}", database.backend_name());

    let resources = Arc::new(ServerResources::new(config, database)?);
    server::run(resources).await?;
    Ok(())
}
