// ABOUTME: Environment-based server configuration with validation at startup
// ABOUTME: Reads OAuth client credentials, provider endpoints, database URL, and HTTP settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server configuration loaded from environment variables
//!
//! Configuration is read once at startup. Any missing required variable or
//! malformed value is a fatal [`ErrorCode::ConfigError`](crate::errors::ErrorCode).
//! Loading goes through a lookup function so tests never touch the process
//! environment.

use std::env;
use std::fmt;

use url::Url;

use crate::constants::{network, provider};
use crate::database_plugins::factory::redact_database_url;
use crate::errors::{AppError, AppResult};
use crate::logging::{LogFormat, LoggingConfig};

/// Environment variable names
pub mod vars {
    /// OAuth client identifier
    pub const CLIENT_ID: &str = "CLIENT_ID";
    /// OAuth client secret
    pub const CLIENT_SECRET: &str = "CLIENT_SECRET";
    /// Callback URL registered with the provider
    pub const REDIRECT_URL: &str = "REDIRECT_URL";
    /// Database connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Provider authorization endpoint override
    pub const AUTH_URL: &str = "HR_AUTH_URL";
    /// Provider token endpoint override
    pub const TOKEN_URL: &str = "HR_TOKEN_URL";
    /// User record endpoint override
    pub const USER_URL: &str = "HR_USER_URL";
    /// Requested scopes, space or comma separated
    pub const SCOPES: &str = "HR_SCOPES";
    /// Listening port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Bind host
    pub const HOST: &str = "HOST";
    /// Default log level
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Log output format
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}

/// OAuth client registration and provider endpoints
#[derive(Clone)]
pub struct OAuthProviderConfig {
    /// Client identifier issued by the provider
    pub client_id: String,
    /// Client secret issued by the provider
    pub client_secret: String,
    /// Callback URL on this server
    pub redirect_url: Url,
    /// Authorization endpoint
    pub auth_url: Url,
    /// Token endpoint
    pub token_url: Url,
    /// Endpoint returning the signed-in user's record
    pub user_url: Url,
    /// Requested scopes
    pub scopes: Vec<String>,
}

impl OAuthProviderConfig {
    /// Whether cookies should carry the `Secure` flag
    ///
    /// Derived from the callback URL: a provider redirecting to `https://`
    /// means the browser talks to us over TLS.
    #[must_use]
    pub fn requires_secure_cookies(&self) -> bool {
        self.redirect_url.scheme() == "https"
    }
}

impl fmt::Debug for OAuthProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthProviderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_url", &self.redirect_url.as_str())
            .field("auth_url", &self.auth_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .field("user_url", &self.user_url.as_str())
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Complete server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Listening port
    pub http_port: u16,
    /// Database connection string
    pub database_url: String,
    /// OAuth settings
    pub oauth: OAuthProviderConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("http_port", &self.http_port)
            .field("database_url", &redact_database_url(&self.database_url))
            .field("oauth", &self.oauth)
            .field("logging", &self.logging)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a required variable is missing or empty,
    /// or if a URL, port, or log format cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Same conditions as [`ServerConfig::from_env`]
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            optional(key).ok_or_else(|| {
                AppError::config(format!("Missing required environment variable {key}"))
            })
        };

        let client_id = required(vars::CLIENT_ID)?;
        let client_secret = required(vars::CLIENT_SECRET)?;
        let redirect_url = parse_url(vars::REDIRECT_URL, &required(vars::REDIRECT_URL)?)?;
        let database_url = required(vars::DATABASE_URL)?;

        let auth_url = parse_url(
            vars::AUTH_URL,
            &optional(vars::AUTH_URL).unwrap_or_else(|| provider::DEFAULT_AUTH_URL.to_owned()),
        )?;
        let token_url = parse_url(
            vars::TOKEN_URL,
            &optional(vars::TOKEN_URL).unwrap_or_else(|| provider::DEFAULT_TOKEN_URL.to_owned()),
        )?;
        let user_url = parse_url(
            vars::USER_URL,
            &optional(vars::USER_URL).unwrap_or_else(|| provider::DEFAULT_USER_URL.to_owned()),
        )?;
        let scopes = optional(vars::SCOPES).map_or_else(
            || {
                provider::DEFAULT_SCOPES
                    .iter()
                    .map(|s| (*s).to_owned())
                    .collect()
            },
            |raw| parse_scopes(&raw),
        );

        let http_port = optional(vars::HTTP_PORT)
            .map(|raw| {
                raw.parse::<u16>().map_err(|e| {
                    AppError::config(format!("Invalid {} '{raw}': {e}", vars::HTTP_PORT))
                })
            })
            .transpose()?
            .unwrap_or(network::DEFAULT_HTTP_PORT);
        let host = optional(vars::HOST).unwrap_or_else(|| network::DEFAULT_HOST.to_owned());

        let logging = LoggingConfig {
            level: optional(vars::LOG_LEVEL).unwrap_or_else(|| LoggingConfig::default().level),
            format: optional(vars::LOG_FORMAT)
                .map(|raw| raw.parse::<LogFormat>())
                .transpose()?
                .unwrap_or_default(),
        };

        Ok(Self {
            host,
            http_port,
            database_url,
            oauth: OAuthProviderConfig {
                client_id,
                client_secret,
                redirect_url,
                auth_url,
                token_url,
                user_url,
                scopes,
            },
            logging,
        })
    }
}

fn parse_url(key: &str, raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| AppError::config(format!("Invalid URL in {key} '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::config(format!(
            "Invalid URL in {key} '{raw}': scheme must be http or https"
        )));
    }
    Ok(url)
}

fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
