// ABOUTME: Health check route reporting database reachability as JSON
// ABOUTME: Returns 200 when SELECT 1 succeeds and 503 otherwise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::database_plugins::DatabaseProvider;
use crate::resources::ServerResources;

/// Overall service status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Database reachable
    Ok,
    /// Database unreachable
    Unavailable,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: HealthStatus,
    /// Active database backend
    pub database: String,
    /// Failure detail when unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let database = resources.database.backend_name().to_owned();
        match resources.database.ping().await {
            Ok(()) => Json(HealthResponse {
                status: HealthStatus::Ok,
                database,
                error: None,
            })
            .into_response(),
            Err(e) => {
                error!("Health check failed: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(HealthResponse {
                        status: HealthStatus::Unavailable,
                        database,
                        error: Some(e.message),
                    }),
                )
                    .into_response()
            }
        }
    }
}
