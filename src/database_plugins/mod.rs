// ABOUTME: Database abstraction layer for the HR sync server
// ABOUTME: Plugin architecture for database support with SQLite and PostgreSQL backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::{RemoteUser, UserRecord};

/// Database provider factory
pub mod factory;

/// PostgreSQL database implementation
#[cfg(feature = "postgresql")]
pub mod postgres;

/// Core database abstraction trait
///
/// All database implementations must implement this trait to provide
/// a consistent interface for the application layer.
#[async_trait]
pub trait DatabaseProvider: Send + Sync + Clone {
    /// Create a new database connection and apply the schema
    async fn new(database_url: &str) -> AppResult<Self>
    where
        Self: Sized;

    /// Run database migrations to set up schema
    async fn migrate(&self) -> AppResult<()>;

    /// Round-trip a trivial query (`SELECT 1`)
    async fn ping(&self) -> AppResult<()>;

    // ================================
    // User Cache
    // ================================

    /// Insert or update the user keyed by its external ID and return the stored row
    async fn upsert_user(&self, user: &RemoteUser) -> AppResult<UserRecord>;

    /// Get a cached user by external ID
    async fn get_user_by_external_id(&self, external_id: &str) -> AppResult<Option<UserRecord>>;

    /// Number of cached users
    async fn count_users(&self) -> AppResult<i64>;
}
