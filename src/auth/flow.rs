// ABOUTME: OAuth authorization-code flow service for login, callback, and token upkeep
// ABOUTME: Validates per-session state before any network call and refreshes expired tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! OAuth flow service
//!
//! Route handlers delegate to [`OAuthFlowService`]:
//! - `/login` calls [`OAuthFlowService::begin_login`]
//! - `/callback` calls [`OAuthFlowService::complete_login`]
//! - `/fetch` calls [`OAuthFlowService::usable_token`]

use chrono::Utc;
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

use super::session::{SessionStore, StateCheck};
use crate::errors::{AppError, AppResult};
use crate::oauth2_client::{OAuth2Client, OAuth2Token};

/// Result of starting a login
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    /// Session the login belongs to (new or reused)
    pub session_id: Uuid,
    /// Provider URL the browser must visit
    pub authorization_url: Url,
}

/// Query parameters delivered to the callback route
#[derive(Debug, Default, Clone, Copy)]
pub struct CallbackInput<'a> {
    /// Echoed anti-forgery state
    pub state: Option<&'a str>,
    /// Authorization code
    pub code: Option<&'a str>,
    /// Provider error code, when the user denied access
    pub error: Option<&'a str>,
    /// Provider error description
    pub error_description: Option<&'a str>,
}

/// Authorization-code flow bound to one provider and one session store
#[derive(Clone)]
pub struct OAuthFlowService {
    sessions: SessionStore,
    client: OAuth2Client,
}

impl OAuthFlowService {
    /// Create the service
    #[must_use]
    pub const fn new(sessions: SessionStore, client: OAuth2Client) -> Self {
        Self { sessions, client }
    }

    /// Session storage backing the flow
    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Start a login, reusing the caller's session when it is still known
    #[must_use]
    pub fn begin_login(&self, existing_session: Option<Uuid>) -> LoginRedirect {
        let session_id = existing_session
            .filter(|id| self.sessions.contains(*id))
            .unwrap_or_else(|| self.sessions.create_session());
        let state = self.sessions.begin_authorization(session_id);
        let authorization_url = self.client.authorization_url(&state);

        info!(
            provider = authorization_url.host_str().unwrap_or_default(),
            "Starting OAuth authorization"
        );
        LoginRedirect {
            session_id,
            authorization_url,
        }
    }

    /// Validate the callback and exchange the code for the session's token
    ///
    /// State and code are checked before any network traffic. On success the
    /// session's token is replaced exactly once.
    ///
    /// # Errors
    ///
    /// - Invalid input if the provider reported an error, the state is
    ///   missing, stale, reused, or belongs to another session, or the code
    ///   is empty
    /// - Internal error carrying the provider's message if the exchange fails
    pub async fn complete_login(
        &self,
        session_id: Option<Uuid>,
        input: CallbackInput<'_>,
    ) -> AppResult<()> {
        if let Some(error) = input.error {
            let detail = input
                .error_description
                .map_or_else(String::new, |d| format!(": {d}"));
            return Err(AppError::invalid_input(format!(
                "Authorization failed at provider ({error}){detail}"
            )));
        }

        let check = session_id.map_or(StateCheck::UnknownSession, |id| {
            self.sessions
                .consume_state(id, input.state.unwrap_or_default(), Utc::now())
        });
        let session_id = match (check, session_id) {
            (StateCheck::Accepted, Some(id)) => id,
            (rejected, _) => {
                warn!(reason = rejected.reason(), "Rejected OAuth callback");
                return Err(AppError::invalid_input(format!(
                    "Invalid OAuth state: {}",
                    rejected.reason()
                )));
            }
        };

        let code = input
            .code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::invalid_input("Missing authorization code"))?;

        let token = self.client.exchange_code(code).await.map_err(|e| {
            error!("OAuth token exchange failed: {e}");
            AppError::internal(format!("Failed to exchange OAuth code for token: {e}"))
        })?;

        self.sessions.store_token(session_id, token);
        info!("OAuth login completed");
        Ok(())
    }

    /// Whether the session holds a token that is valid or refreshable
    #[must_use]
    pub fn has_usable_token(&self, session_id: Uuid) -> bool {
        self.sessions
            .token(session_id)
            .is_some_and(|t| !t.is_expired() || t.can_refresh())
    }

    /// Return a valid token for the session, refreshing it if needed
    ///
    /// Returns `None` when the session has no token, or the token is expired
    /// and cannot be refreshed. A failed refresh drops the stale token.
    pub async fn usable_token(&self, session_id: Uuid) -> Option<OAuth2Token> {
        let token = self.sessions.token(session_id)?;
        if !token.is_expired() {
            return Some(token);
        }

        let Some(refresh_token) = token.refresh_token.as_deref().filter(|t| !t.is_empty()) else {
            info!("Access token expired and no refresh token is held");
            return None;
        };

        match self.client.refresh_token(refresh_token).await {
            Ok(refreshed) => {
                self.sessions.store_token(session_id, refreshed.clone());
                Some(refreshed)
            }
            Err(e) => {
                warn!("Token refresh failed, login required: {e}");
                self.sessions.clear_token(session_id);
                None
            }
        }
    }

    /// End the session
    pub fn logout(&self, session_id: Uuid) {
        if self.sessions.remove(session_id) {
            info!("Session logged out");
        }
    }
}
