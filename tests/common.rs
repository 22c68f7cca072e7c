// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging setup, a fake OAuth/HR provider, and ready-wired server resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::significant_drop_tightening
)]
//! Shared test utilities for `hr_sync_server`

use std::collections::HashMap;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use hr_sync_server::config::environment::{vars, ServerConfig};
use hr_sync_server::database_plugins::{factory::Database, DatabaseProvider};
use hr_sync_server::oauth2_client::OAuth2Token;
use hr_sync_server::resources::ServerResources;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet test logging once per process
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Canned responses served by the fake provider
#[derive(Debug, Clone)]
pub struct FakeBehavior {
    pub token_status: StatusCode,
    pub token_body: Value,
    pub refresh_status: StatusCode,
    pub refresh_body: Value,
    pub user_status: StatusCode,
    pub user_body: String,
}

impl Default for FakeBehavior {
    fn default() -> Self {
        Self {
            token_status: StatusCode::OK,
            token_body: json!({
                "access_token": "access-from-code",
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": "refresh-from-code"
            }),
            refresh_status: StatusCode::OK,
            refresh_body: json!({
                "access_token": "access-from-refresh",
                "token_type": "Bearer",
                "expires_in": 3600
            }),
            user_status: StatusCode::OK,
            user_body: json!({"id": "emp-100", "firstName": "Ada", "lastName": "Lovelace"})
                .to_string(),
        }
    }
}

/// Observations recorded by the fake provider
#[derive(Clone, Default)]
pub struct FakeProviderState {
    pub token_calls: Arc<AtomicUsize>,
    pub user_calls: Arc<AtomicUsize>,
    pub token_requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub bearer_tokens: Arc<Mutex<Vec<String>>>,
    pub behavior: Arc<Mutex<FakeBehavior>>,
}

impl FakeProviderState {
    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    pub fn last_bearer(&self) -> Option<String> {
        self.bearer_tokens.lock().unwrap().last().cloned()
    }

    pub fn last_token_request(&self) -> Option<HashMap<String, String>> {
        self.token_requests.lock().unwrap().last().cloned()
    }

    pub fn update(&self, change: impl FnOnce(&mut FakeBehavior)) {
        change(&mut self.behavior.lock().unwrap());
    }
}

/// OAuth token endpoint plus HR user endpoint on an ephemeral port
pub struct FakeProvider {
    pub base_url: String,
    pub state: FakeProviderState,
}

async fn fake_token(
    State(state): State<FakeProviderState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.token_calls.fetch_add(1, Ordering::SeqCst);
    let is_refresh = form.get("grant_type").map(String::as_str) == Some("refresh_token");
    state.token_requests.lock().unwrap().push(form);

    let behavior = state.behavior.lock().unwrap().clone();
    if is_refresh {
        (behavior.refresh_status, Json(behavior.refresh_body)).into_response()
    } else {
        (behavior.token_status, Json(behavior.token_body)).into_response()
    }
}

async fn fake_user(State(state): State<FakeProviderState>, headers: HeaderMap) -> Response {
    state.user_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        state.bearer_tokens.lock().unwrap().push(bearer.to_owned());
    }

    let behavior = state.behavior.lock().unwrap().clone();
    (
        behavior.user_status,
        [(header::CONTENT_TYPE, "application/json")],
        behavior.user_body,
    )
        .into_response()
}

/// Start the fake provider in the background
pub async fn spawn_fake_provider() -> FakeProvider {
    let state = FakeProviderState::default();
    let app = Router::new()
        .route("/token", post(fake_token))
        .route("/users/me", get(fake_user))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeProvider {
        base_url: format!("http://{addr}"),
        state,
    }
}

/// Configuration pointing every provider endpoint at `base_url`
pub fn test_config(base_url: &str, database_url: &str) -> ServerConfig {
    let values: HashMap<&str, String> = HashMap::from([
        (vars::CLIENT_ID, "test-client".to_owned()),
        (vars::CLIENT_SECRET, "test-secret".to_owned()),
        (
            vars::REDIRECT_URL,
            "http://localhost:8080/callback".to_owned(),
        ),
        (vars::DATABASE_URL, database_url.to_owned()),
        (vars::AUTH_URL, format!("{base_url}/authorize")),
        (vars::TOKEN_URL, format!("{base_url}/token")),
        (vars::USER_URL, format!("{base_url}/users/me")),
    ]);
    ServerConfig::from_lookup(|key| values.get(key).cloned()).unwrap()
}

/// In-memory database with the schema applied
pub async fn create_test_database() -> Database {
    Database::new("sqlite::memory:").await.unwrap()
}

/// Server resources wired to a fresh fake provider and in-memory database
pub async fn create_test_server_resources() -> (Arc<ServerResources>, FakeProvider) {
    init_test_logging();
    let provider = spawn_fake_provider().await;
    let config = test_config(&provider.base_url, "sqlite::memory:");
    let database = create_test_database().await;
    let resources = Arc::new(ServerResources::new(config, database).unwrap());
    (resources, provider)
}

/// Query parameter value from a redirect location
pub fn query_param(location: &str, name: &str) -> Option<String> {
    let url = url::Url::parse(location).unwrap();
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Session UUID from a `name=value` cookie pair
pub fn session_id(cookie_pair: &str) -> Uuid {
    let (_, value) = cookie_pair.split_once('=').unwrap();
    Uuid::parse_str(value).unwrap()
}

/// Token that expired a minute ago
pub fn expired_token(access: &str, refresh: Option<&str>) -> OAuth2Token {
    OAuth2Token {
        access_token: access.to_owned(),
        token_type: "Bearer".to_owned(),
        expires_at: Some(Utc::now() - Duration::minutes(1)),
        refresh_token: refresh.map(str::to_owned),
        scope: None,
    }
}

/// Token valid for the next hour
pub fn valid_token(access: &str) -> OAuth2Token {
    OAuth2Token {
        access_token: access.to_owned(),
        token_type: "Bearer".to_owned(),
        expires_at: Some(Utc::now() + Duration::hours(1)),
        refresh_token: None,
        scope: None,
    }
}
