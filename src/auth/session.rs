// ABOUTME: Concurrent in-memory session store for pending OAuth logins and access tokens
// ABOUTME: Binds each anti-forgery state and token to one browser session, never shared globally
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Session storage
//!
//! Sessions are identified by a random UUID carried in an `HttpOnly` cookie.
//! Each session holds at most one pending authorization (the state value
//! issued by `/login`) and at most one token. Everything lives in process
//! memory and disappears on restart.
//!
//! Expired entries are swept whenever a session is created, at most once per
//! sweep interval: a session holding a token lives as long as its cookie, one
//! without a token only as long as a pending login would.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::constants::oauth::STATE_TTL_SECS;
use crate::constants::session::{COOKIE_MAX_AGE_SECS, SWEEP_INTERVAL_SECS};
use crate::oauth2_client::state::{generate_state, states_match};
use crate::oauth2_client::OAuth2Token;

/// Authorization started by `/login` and not yet completed
#[derive(Debug, Clone)]
struct PendingAuthorization {
    state: String,
    issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    pending: Option<PendingAuthorization>,
    token: Option<OAuth2Token>,
    last_seen: DateTime<Utc>,
}

impl SessionEntry {
    fn empty() -> Self {
        Self {
            pending: None,
            token: None,
            last_seen: Utc::now(),
        }
    }

    fn is_live(&self, now: DateTime<Utc>) -> bool {
        let ttl = if self.token.is_some() {
            COOKIE_MAX_AGE_SECS
        } else {
            STATE_TTL_SECS
        };
        self.last_seen + Duration::seconds(ttl) >= now
    }
}

/// Outcome of validating the state echoed back to `/callback`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateCheck {
    /// State matched and has been consumed
    Accepted,
    /// Session unknown to this process
    UnknownSession,
    /// Session exists but has no login in progress
    NoPendingLogin,
    /// Login was started too long ago
    Expired,
    /// State differs from the one issued to this session
    Mismatch,
}

impl StateCheck {
    /// Human-readable rejection reason
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::UnknownSession => "no login in progress for this session",
            Self::NoPendingLogin => "no login in progress or state already used",
            Self::Expired => "login attempt expired, please log in again",
            Self::Mismatch => "state parameter does not match",
        }
    }
}

/// Process-wide map of browser sessions
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, SessionEntry>>,
    // Unix seconds of the last sweep
    last_sweep: Arc<AtomicI64>,
}

impl SessionStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new, empty session and return its identifier
    #[must_use]
    pub fn create_session(&self) -> Uuid {
        self.sweep_if_due(Utc::now());
        let session_id = Uuid::new_v4();
        self.sessions.insert(session_id, SessionEntry::empty());
        session_id
    }

    /// Whether the session is known
    #[must_use]
    pub fn contains(&self, session_id: Uuid) -> bool {
        self.sessions.contains_key(&session_id)
    }

    /// Number of live sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions exist
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Start a login for the session and return the fresh state value
    ///
    /// Replaces any earlier pending login of the same session.
    #[must_use]
    pub fn begin_authorization(&self, session_id: Uuid) -> String {
        let state = generate_state();
        let now = Utc::now();
        let mut entry = self
            .sessions
            .entry(session_id)
            .or_insert_with(SessionEntry::empty);
        entry.pending = Some(PendingAuthorization {
            state: state.clone(),
            issued_at: now,
        });
        entry.last_seen = now;
        state
    }

    /// Validate and consume the state returned by the provider
    ///
    /// A matching state is removed so it cannot be replayed. A stale pending
    /// login is discarded; a mismatching one is kept so the genuine redirect
    /// can still complete.
    #[must_use]
    pub fn consume_state(
        &self,
        session_id: Uuid,
        received: &str,
        now: DateTime<Utc>,
    ) -> StateCheck {
        let Some(mut entry) = self.sessions.get_mut(&session_id) else {
            return StateCheck::UnknownSession;
        };
        let Some(pending) = entry.pending.as_ref() else {
            return StateCheck::NoPendingLogin;
        };

        if pending.issued_at + Duration::seconds(STATE_TTL_SECS) < now {
            entry.pending = None;
            return StateCheck::Expired;
        }
        if !states_match(&pending.state, received) {
            return StateCheck::Mismatch;
        }

        entry.pending = None;
        StateCheck::Accepted
    }

    /// Store the token for the session, replacing any previous one
    pub fn store_token(&self, session_id: Uuid, token: OAuth2Token) {
        let mut entry = self
            .sessions
            .entry(session_id)
            .or_insert_with(SessionEntry::empty);
        entry.token = Some(token);
        entry.last_seen = Utc::now();
        drop(entry);
        debug!("Stored access token for session");
    }

    /// Token currently held by the session
    #[must_use]
    pub fn token(&self, session_id: Uuid) -> Option<OAuth2Token> {
        self.sessions
            .get(&session_id)
            .and_then(|entry| entry.token.clone())
    }

    /// Forget the session's token but keep the session
    pub fn clear_token(&self, session_id: Uuid) {
        if let Some(mut entry) = self.sessions.get_mut(&session_id) {
            entry.token = None;
        }
    }

    /// Drop the session entirely
    pub fn remove(&self, session_id: Uuid) -> bool {
        self.sessions.remove(&session_id).is_some()
    }

    /// Remove sessions that are no longer live at `now`, returning how many
    /// were dropped
    pub fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        let initial_count = self.sessions.len();
        self.sessions.retain(|_, entry| entry.is_live(now));
        let evicted = initial_count.saturating_sub(self.sessions.len());
        if evicted > 0 {
            debug!("Evicted {} expired sessions", evicted);
        }
        evicted
    }

    fn sweep_if_due(&self, now: DateTime<Utc>) {
        let last = self.last_sweep.load(Ordering::Relaxed);
        if now.timestamp() - last < SWEEP_INTERVAL_SECS {
            return;
        }
        // Only one concurrent caller wins the sweep
        if self
            .last_sweep
            .compare_exchange(last, now.timestamp(), Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            self.evict_expired(now);
        }
    }
}
