// ABOUTME: Shared server resources handed to every route through axum state
// ABOUTME: Bundles configuration, database, OAuth flow, and HR API client behind one Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use crate::auth::{OAuthFlowService, SessionStore};
use crate::config::environment::ServerConfig;
use crate::database_plugins::factory::Database;
use crate::errors::AppResult;
use crate::external::HrApiClient;
use crate::oauth2_client::OAuth2Client;
use crate::utils::http_client::build_outbound_client;

/// Dependencies shared by all request handlers
#[derive(Clone)]
pub struct ServerResources {
    /// Validated startup configuration
    pub config: Arc<ServerConfig>,
    /// Users cache
    pub database: Database,
    /// Login, callback, and token upkeep
    pub oauth: OAuthFlowService,
    /// Authenticated HR API access
    pub hr_client: HrApiClient,
}

impl ServerResources {
    /// Wire up resources around an already connected database
    ///
    /// One outbound HTTP client is shared by the OAuth and API clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the outbound HTTP client cannot be built
    pub fn new(config: ServerConfig, database: Database) -> AppResult<Self> {
        let http_client = build_outbound_client()?;
        let oauth_client = OAuth2Client::new(config.oauth.clone(), http_client.clone());
        let hr_client = HrApiClient::new(config.oauth.user_url.clone(), http_client);

        Ok(Self {
            config: Arc::new(config),
            database,
            oauth: OAuthFlowService::new(SessionStore::new(), oauth_client),
            hr_client,
        })
    }

    /// Whether session cookies must carry the `Secure` flag
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.config.oauth.requires_secure_cookies()
    }
}
