// ABOUTME: Main library entry point for the HR sync server
// ABOUTME: OAuth 2.0 client for an HR API that caches the signed-in user's record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # HR Sync Server
//!
//! A small web server that signs a user in to a third-party HR system with
//! the OAuth 2.0 authorization-code flow, fetches that user's record from
//! the HR API, and upserts it into a local `users` table.
//!
//! ## Architecture
//!
//! - **Auth**: per-browser sessions, anti-forgery state, token refresh
//! - **`OAuth2` client**: authorization URL, code exchange, refresh grant
//! - **External**: HR API client
//! - **Database**: `SQLite` by default, `PostgreSQL` behind a feature flag
//! - **Routes**: `/`, `/login`, `/callback`, `/fetch`, `/logout`, `/health`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use hr_sync_server::config::environment::ServerConfig;
//! use hr_sync_server::database_plugins::factory::Database;
//! use hr_sync_server::errors::AppResult;
//! use hr_sync_server::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let database =
//!         Database::connect_with_startup_retry(&config.database_url, Duration::from_secs(5))
//!             .await?;
//!     let resources = Arc::new(ServerResources::new(config, database)?);
//!     hr_sync_server::server::run(resources).await
//! }
//! ```

/// Browser sessions and the OAuth login flow
pub mod auth;

/// Environment-based configuration
pub mod config;

/// Application constants and defaults
pub mod constants;

/// `SQLite` database implementation
pub mod database;

/// Database abstraction and backend factory
pub mod database_plugins;

/// Unified error handling
pub mod errors;

/// HR API client
pub mod external;

/// Logging configuration
pub mod logging;

/// Remote and persisted user models
pub mod models;

/// OAuth 2.0 client for the HR provider
pub mod oauth2_client;

/// Shared server resources
pub mod resources;

/// HTTP routes
pub mod routes;

/// Session cookie helpers
pub mod security;

/// HTTP server lifecycle
pub mod server;

/// Shared helpers
pub mod utils;
