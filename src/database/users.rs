// ABOUTME: User cache database operations for SQLite
// ABOUTME: Upserts fetched HR records keyed by external ID and reads them back
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use tracing::debug;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{RemoteUser, UserRecord};

impl Database {
    /// Insert the user, or refresh names and `fetched_at` if the external ID exists
    ///
    /// `created_at` is only written on first insert.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn upsert_user_impl(&self, user: &RemoteUser) -> AppResult<UserRecord> {
        let now = Utc::now();
        let record = sqlx::query_as::<_, UserRecord>(
            r"
            INSERT INTO users (external_id, first_name, last_name, created_at, fetched_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (external_id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                fetched_at = excluded.fetched_at
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

    /// Look up a cached user by HR system identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user_by_external_id_impl(
        &self,
        external_id: &str,
    ) -> AppResult<Option<UserRecord>> {
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

    /// Number of cached users
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_users_impl(&self) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {e}")))?;
        Ok(count)
    }
}
