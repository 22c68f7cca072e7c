// ABOUTME: OAuth browser routes for login redirect, provider callback, and logout
// ABOUTME: Manages the session cookie and delegates the flow to OAuthFlowService
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tokio::task;

use crate::auth::flow::CallbackInput;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::security::cookies::{clear_session_cookie, session_id_from_headers, set_session_cookie};

/// Query parameters the provider appends to the redirect URL
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    /// Echoed anti-forgery state
    pub state: Option<String>,
    /// Authorization code
    pub code: Option<String>,
    /// Provider error code
    pub error: Option<String>,
    /// Provider error description
    pub error_description: Option<String>,
}

/// OAuth login routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create the login, callback, and logout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/login", get(Self::handle_login))
            .route("/callback", get(Self::handle_callback))
            .route("/logout", get(Self::handle_logout))
            .with_state(resources)
    }

    /// Redirect the browser to the provider's consent page
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Response {
        task::yield_now().await;

        let login = resources
            .oauth
            .begin_login(session_id_from_headers(&headers));
        let mut response = Redirect::temporary(login.authorization_url.as_str()).into_response();
        set_session_cookie(
            response.headers_mut(),
            login.session_id,
            resources.secure_cookies(),
        );
        response
    }

    /// Validate the provider redirect and store the session's token
    #[tracing::instrument(skip_all, fields(route = "oauth_callback"))]
    async fn handle_callback(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<CallbackParams>,
    ) -> Result<Redirect, AppError> {
        let input = CallbackInput {
            state: params.state.as_deref(),
            code: params.code.as_deref(),
            error: params.error.as_deref(),
            error_description: params.error_description.as_deref(),
        };
        resources
            .oauth
            .complete_login(session_id_from_headers(&headers), input)
            .await?;
        Ok(Redirect::temporary("/"))
    }

    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Response {
        task::yield_now().await;

        if let Some(session_id) = session_id_from_headers(&headers) {
            resources.oauth.logout(session_id);
        }
        let mut response = Redirect::temporary("/").into_response();
        clear_session_cookie(response.headers_mut(), resources.secure_cookies());
        response
    }
}
