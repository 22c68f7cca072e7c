// ABOUTME: OAuth 2.0 authorization-code client for the HR provider
// ABOUTME: Builds authorization URLs, exchanges codes for tokens, and refreshes expired tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! OAuth 2.0 client (this server as client to the HR provider)
//!
//! Implements the three provider interactions of the authorization-code flow:
//! building the browser redirect, exchanging the returned code, and using a
//! refresh token once the access token has expired.

/// Anti-forgery state generation and comparison
pub mod state;

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::config::environment::OAuthProviderConfig;
use crate::constants::oauth::EXPIRY_SKEW_SECS;
use crate::errors::{AppError, AppResult};

/// Label used when reporting token endpoint failures
const TOKEN_ENDPOINT: &str = "OAuth token endpoint";

/// Access token held for a session
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth2Token {
    /// Bearer credential for the HR API
    pub access_token: String,
    /// Token type reported by the provider (usually `Bearer`)
    pub token_type: String,
    /// Absolute expiry, when the provider reported one
    pub expires_at: Option<DateTime<Utc>>,
    /// Credential for obtaining a new access token
    pub refresh_token: Option<String>,
    /// Granted scopes
    pub scope: Option<String>,
}

impl OAuth2Token {
    /// Whether the token is expired, or expires within the safety window
    ///
    /// Tokens without an expiry never expire from our point of view.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= now + Duration::seconds(EXPIRY_SKEW_SECS))
    }

    /// [`OAuth2Token::is_expired_at`] evaluated now
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether a refresh can be attempted
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

impl fmt::Debug for OAuth2Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Token")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("scope", &self.scope)
            .finish()
    }
}

/// Token endpoint response body
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_owned()
}

impl TokenResponse {
    fn into_token(self, issued_at: DateTime<Utc>) -> OAuth2Token {
        OAuth2Token {
            access_token: self.access_token,
            token_type: self.token_type,
            expires_at: self
                .expires_in
                .map(|secs| issued_at + Duration::seconds(secs)),
            refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
            scope: self.scope,
        }
    }
}

/// OAuth 2.0 client bound to one provider registration
#[derive(Clone)]
pub struct OAuth2Client {
    config: OAuthProviderConfig,
    http_client: Client,
}

impl OAuth2Client {
    /// Create a client for the configured provider
    #[must_use]
    pub const fn new(config: OAuthProviderConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Build the authorization URL the browser is redirected to
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> Url {
        let scope = self.config.scopes.join(" ");
        let mut url = self.config.auth_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", self.config.redirect_url.as_str());
            if !scope.is_empty() {
                query.append_pair("scope", &scope);
            }
            query.append_pair("state", state);
        }
        url
    }

    /// Exchange an authorization code for a token
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-2xx token endpoint response
    /// (status and body included), or an unparseable response body
    pub async fn exchange_code(&self, code: &str) -> AppResult<OAuth2Token> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let token = self.request_token(&params).await?;
        info!(
            expires_at = ?token.expires_at,
            has_refresh_token = token.refresh_token.is_some(),
            "Exchanged authorization code for access token"
        );
        Ok(token)
    }

    /// Obtain a new access token using a refresh token
    ///
    /// The previous refresh token is kept when the provider does not rotate it.
    ///
    /// # Errors
    ///
    /// Same conditions as [`OAuth2Client::exchange_code`]
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<OAuth2Token> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let mut token = self.request_token(&params).await?;
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_owned());
        }
        info!(expires_at = ?token.expires_at, "Refreshed access token");
        Ok(token)
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> AppResult<OAuth2Token> {
        debug!(token_url = %self.config.token_url, "Requesting OAuth token");
        let issued_at = Utc::now();
        let response = self
            .http_client
            .post(self.config.token_url.clone())
            .header(header::ACCEPT, "application/json")
            .form(params)
            .send()
            .await
            .map_err(|e| AppError::external_service(TOKEN_ENDPOINT, e.to_string()))?;

        let response = ensure_success(response, TOKEN_ENDPOINT).await?;
        let body: TokenResponse = response.json().await.map_err(|e| {
            AppError::external_service(TOKEN_ENDPOINT, format!("JSON parse error: {e}"))
        })?;
        Ok(body.into_token(issued_at))
    }
}

/// Pass a 2xx response through, otherwise turn status and body into an error
///
/// # Errors
///
/// Returns an external service error carrying the HTTP status and response body
pub async fn ensure_success(response: Response, service: &str) -> AppResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    Err(status_error(response, service).await)
}

/// Pass only a `200 OK` response through
///
/// # Errors
///
/// Returns an external service error carrying the HTTP status and response
/// body for any other status, including other 2xx codes
pub async fn ensure_ok(response: Response, service: &str) -> AppResult<Response> {
    if response.status() == StatusCode::OK {
        return Ok(response);
    }
    Err(status_error(response, service).await)
}

async fn status_error(response: Response, service: &str) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    AppError::external_service(service, format!("HTTP {status}: {body}"))
}
