// ABOUTME: HR API client for retrieving the signed-in user's record with a bearer token
// ABOUTME: Surfaces non-200 responses with status and body, and decode failures verbatim
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HR API Client
//!
//! Issues a single authenticated GET against the configured user endpoint and
//! decodes the response into a [`RemoteUser`]. There is no caching and no
//! retry; every call goes to the network.

use reqwest::{header, Client};
use tracing::debug;
use url::Url;

use crate::constants::provider::SERVICE_LABEL;
use crate::errors::{AppError, AppResult};
use crate::models::RemoteUser;
use crate::oauth2_client::{ensure_ok, OAuth2Token};

/// Client for the HR API user endpoint
#[derive(Clone)]
pub struct HrApiClient {
    user_url: Url,
    http_client: Client,
}

impl HrApiClient {
    /// Create a client for the given user endpoint
    #[must_use]
    pub const fn new(user_url: Url, http_client: Client) -> Self {
        Self {
            user_url,
            http_client,
        }
    }

    /// Fetch the user record visible to the token holder
    ///
    /// # Errors
    ///
    /// Returns an external service error if the request cannot be sent, the
    /// API answers with any status other than 200 (status and body included), or the
    /// body does not decode as a user record
    pub async fn fetch_current_user(&self, token: &OAuth2Token) -> AppResult<RemoteUser> {
        debug!(url = %self.user_url, "Fetching current user from HR API");
        let response = self
            .http_client
            .get(self.user_url.clone())
            .bearer_auth(&token.access_token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE_LABEL, e.to_string()))?;

        let response = ensure_ok(response, SERVICE_LABEL).await?;
        let body = response
            .text()
            .await
            .map_err(|e| AppError::external_service(SERVICE_LABEL, e.to_string()))?;

        serde_json::from_str::<RemoteUser>(&body).map_err(|e| {
            AppError::external_service(SERVICE_LABEL, format!("JSON parse error: {e}"))
        })
    }
}
