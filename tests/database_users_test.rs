// ABOUTME: Integration tests for the users cache and the health route
// ABOUTME: Verifies upsert idempotence, lookups, file-backed SQLite, and health reporting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::time::Duration;

use axum::http::StatusCode;
use common::{create_test_database, create_test_server_resources};
use helpers::axum_test::AxumTestRequest;
use hr_sync_server::database_plugins::factory::Database;
use hr_sync_server::database_plugins::DatabaseProvider;
use hr_sync_server::models::RemoteUser;
use hr_sync_server::routes::health::{HealthResponse, HealthStatus};
use hr_sync_server::server::build_app;

fn remote(id: &str, first: &str, last: &str) -> RemoteUser {
    RemoteUser {
        external_id: id.to_owned(),
        first_name: first.to_owned(),
        last_name: last.to_owned(),
    }
}

#[tokio::test]
async fn test_upsert_is_idempotent_per_external_id() {
    let db = create_test_database().await;

    let first = db.upsert_user(&remote("emp-1", "Ada", "Byron")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = db
        .upsert_user(&remote("emp-1", "Ada", "Lovelace"))
        .await
        .unwrap();

    assert_eq!(db.count_users().await.unwrap(), 1);
    assert_eq!(second.id, first.id);
    assert_eq!(second.last_name, "Lovelace");
    assert_eq!(second.created_at, first.created_at);
    assert!(second.fetched_at > first.fetched_at);

    let stored = db.get_user_by_external_id("emp-1").await.unwrap().unwrap();
    assert_eq!(stored, second);
}

#[tokio::test]
async fn test_distinct_external_ids_get_distinct_rows() {
    let db = create_test_database().await;

    let a = db.upsert_user(&remote("emp-1", "Ada", "Lovelace")).await.unwrap();
    let b = db.upsert_user(&remote("emp-2", "Grace", "Hopper")).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(db.count_users().await.unwrap(), 2);
    assert!(db.get_user_by_external_id("emp-3").await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_backed_database_survives_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("users.db").display());

    {
        let db = Database::new(&url).await.unwrap();
        db.upsert_user(&remote("emp-9", "Alan", "Turing")).await.unwrap();
    }

    let db = Database::connect_with_startup_retry(&url, Duration::from_millis(1))
        .await
        .unwrap();
    let stored = db.get_user_by_external_id("emp-9").await.unwrap().unwrap();
    assert_eq!(stored.first_name, "Alan");
}

#[tokio::test]
async fn test_health_reports_database_backend() {
    let (resources, _provider) = create_test_server_resources().await;

    let response = AxumTestRequest::get("/health")
        .send(build_app(&resources))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let health: HealthResponse = response.json();
    assert_eq!(health.status, HealthStatus::Ok);
    assert_eq!(health.database, "sqlite");
    assert!(health.error.is_none());
}

#[tokio::test]
async fn test_health_reports_unavailable_database() {
    let (resources, _provider) = create_test_server_resources().await;
    if let Database::SQLite(db) = &resources.database {
        db.pool().close().await;
    }

    let response = AxumTestRequest::get("/health")
        .send(build_app(&resources))
        .await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let health: HealthResponse = response.json();
    assert_eq!(health.status, HealthStatus::Unavailable);
    assert!(health.error.is_some());
}
