// ABOUTME: Fetch route retrieving the signed-in user's HR record and caching it locally
// ABOUTME: Redirects to login without a usable token and reports upstream failures as 502
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use tracing::info;

use super::pages;
use crate::database_plugins::DatabaseProvider;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::security::cookies::session_id_from_headers;

/// HR record routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create the fetch route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/fetch", get(Self::handle_fetch))
            .with_state(resources)
    }

    /// Fetch the current user from the HR API, upsert it, and render the stored row
    ///
    /// No remote call is made unless the session holds a valid (or
    /// successfully refreshed) token. Nothing is written when the API call or
    /// decoding fails.
    #[tracing::instrument(skip_all, fields(route = "fetch"))]
    async fn handle_fetch(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let Some(session_id) = session_id_from_headers(&headers) else {
            return Ok(Redirect::temporary("/login").into_response());
        };
        let Some(token) = resources.oauth.usable_token(session_id).await else {
            return Ok(Redirect::temporary("/login").into_response());
        };

        let remote = resources.hr_client.fetch_current_user(&token).await?;
        let record = resources.database.upsert_user(&remote).await?;

        info!(
            external_id = %record.external_id,
            id = record.id,
            "Stored HR user record"
        );
        Ok(pages::user_saved(&record).into_response())
    }
}
