// ABOUTME: Outbound HTTP client factory shared by the OAuth client and the HR API client
// ABOUTME: Applies request timeout, user agent, and disables redirect following
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use reqwest::{redirect::Policy, Client};

use crate::constants::{network::OUTBOUND_TIMEOUT_SECS, SERVICE_NAME};
use crate::errors::{AppError, AppResult};

/// Build the HTTP client used for provider and API calls
///
/// Redirects are not followed so an authorization code or bearer token is
/// never replayed to a host other than the configured endpoint.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized
pub fn build_outbound_client() -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(OUTBOUND_TIMEOUT_SECS))
        .user_agent(concat!("hr-sync-server/", env!("CARGO_PKG_VERSION")))
        .redirect(Policy::none())
        .build()
        .map_err(|e| AppError::config(format!("Failed to build {SERVICE_NAME} HTTP client: {e}")))
}
