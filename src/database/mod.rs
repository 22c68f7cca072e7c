// ABOUTME: SQLite database management with embedded migrations for the users cache
// ABOUTME: Owns the connection pool and implements the DatabaseProvider trait for SQLite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// User cache operations
pub mod users;

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::database_plugins::DatabaseProvider;
use crate::errors::{AppError, AppResult};
use crate::models::{RemoteUser, UserRecord};

/// `SQLite` connection pool
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - `SQLite` file creation fails
    /// - Migration process fails
    async fn new_impl(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true);

        // An in-memory database lives only as long as its connection
        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate_impl()
            .await
            .map_err(|e| AppError::database(format!("Database migration failed: {e}")))?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn migrate_impl(&self) -> AppResult<()> {
        info!("Running database migrations...");

        // Embedded at compile time, independent of the working directory
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    async fn ping_impl(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[async_trait]
impl DatabaseProvider for Database {
    async fn new(database_url: &str) -> AppResult<Self> {
        Self::new_impl(database_url).await
    }

    async fn migrate(&self) -> AppResult<()> {
        self.migrate_impl().await
    }

    async fn ping(&self) -> AppResult<()> {
        self.ping_impl().await
    }

    async fn upsert_user(&self, user: &RemoteUser) -> AppResult<UserRecord> {
        self.upsert_user_impl(user).await
    }

    async fn get_user_by_external_id(&self, external_id: &str) -> AppResult<Option<UserRecord>> {
        self.get_user_by_external_id_impl(external_id).await
    }

    async fn count_users(&self) -> AppResult<i64> {
        self.count_users_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:cache?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite:./data/users.db"));
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db.ping().await.unwrap();
        assert_eq!(db.count_users().await.unwrap(), 0);
    }
}
