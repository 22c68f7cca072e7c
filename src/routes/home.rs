// ABOUTME: Landing page route showing login or fetch links for the session
// ABOUTME: Reads the session cookie only, never calls the provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tokio::task;

use super::pages;
use crate::resources::ServerResources;
use crate::security::cookies::session_id_from_headers;

/// Landing page routes
pub struct HomeRoutes;

impl HomeRoutes {
    /// Create the landing page route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_home))
            .with_state(resources)
    }

    async fn handle_home(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Html<String> {
        task::yield_now().await;

        let logged_in = session_id_from_headers(&headers)
            .is_some_and(|id| resources.oauth.has_usable_token(id));
        pages::home(logged_in)
    }
}
