// ABOUTME: PostgreSQL database implementation for shared and production deployments
// ABOUTME: Creates the users cache schema in code and implements the DatabaseProvider trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! `PostgreSQL` database implementation
//!
//! This module provides `PostgreSQL` support, implementing the same
//! interface as the `SQLite` version.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::{debug, info};

use super::DatabaseProvider;
use crate::errors::{AppError, AppResult};
use crate::models::{RemoteUser, UserRecord};

/// Maximum pooled connections
const MAX_CONNECTIONS: u32 = 10;
/// Seconds to wait for a pooled connection
const ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// `PostgreSQL` database implementation
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    async fn new_impl(database_url: &str) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Some(Duration::from_secs(300)))
            .max_lifetime(Some(Duration::from_secs(600)))
            // Test connections before returning to caller to detect stale connections
            .test_before_acquire(true)
            .connect(database_url)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to PostgreSQL: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    async fn create_users_table(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                external_id TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
                fetched_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create users table: {e}")))?;
        Ok(())
    }

    async fn create_indexes(&self) -> AppResult<()> {
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_external_id ON users(external_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create users index: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl DatabaseProvider for PostgresDatabase {
    async fn new(database_url: &str) -> AppResult<Self> {
        Self::new_impl(database_url).await
    }

    async fn migrate(&self) -> AppResult<()> {
        info!("Creating PostgreSQL schema");
        self.create_users_table().await?;
        self.create_indexes().await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    async fn upsert_user(&self, user: &RemoteUser) -> AppResult<UserRecord> {
        let now = Utc::now();
        let record = sqlx::query_as::<_, UserRecord>(
            r"
            INSERT INTO users (external_id, first_name, last_name, created_at, fetched_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (external_id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                fetched_at = EXCLUDED.fetched_at
            RETURNING id, external_id, first_name, last_name, created_at, fetched_at
            ",
        )
        .bind(&user.external_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert user: {e}")))?;

        debug!(id = record.id, "Upserted user record");
        Ok(record)
    }

    async fn get_user_by_external_id(&self, external_id: &str) -> AppResult<Option<UserRecord>> {
        sqlx::query_as::<_, UserRecord>(
            r"
            SELECT id, external_id, first_name, last_name, created_at, fetched_at
            FROM users
            WHERE external_id = $1
            ",
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user by external id: {e}")))
    }

    async fn count_users(&self) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {e}")))?;
        Ok(count)
    }
}
