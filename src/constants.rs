// ABOUTME: Application constants for HTTP defaults, OAuth timing, and provider endpoints
// ABOUTME: Centralizes values that would otherwise be scattered as magic numbers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Service name used in logs and user-agent strings
pub const SERVICE_NAME: &str = "hr-sync-server";

/// HTTP server defaults
pub mod network {
    /// Default listening port
    pub const DEFAULT_HTTP_PORT: u16 = 8080;
    /// Default bind host
    pub const DEFAULT_HOST: &str = "127.0.0.1";
    /// Outbound request timeout for provider and API calls
    pub const OUTBOUND_TIMEOUT_SECS: u64 = 30;
}

/// Default endpoints of the HR provider (Paycor)
pub mod provider {
    /// Authorization endpoint the browser is redirected to
    pub const DEFAULT_AUTH_URL: &str = "https://hcm.paycor.com/AppActivation/Authorize";
    /// Token endpoint for code exchange and refresh
    pub const DEFAULT_TOKEN_URL: &str = "https://api.paycor.com/v1/token";
    /// Endpoint returning the signed-in user's record
    pub const DEFAULT_USER_URL: &str = "https://api.paycor.com/v1/users/me";
    /// Scopes requested when none are configured
    pub const DEFAULT_SCOPES: &[&str] = &["offline_access"];
    /// Name used when reporting upstream failures
    pub const SERVICE_LABEL: &str = "HR API";
}

/// OAuth flow timing
pub mod oauth {
    /// Lifetime of a pending authorization (state) in seconds
    pub const STATE_TTL_SECS: i64 = 600;
    /// Tokens expiring within this window are treated as expired
    pub const EXPIRY_SKEW_SECS: i64 = 30;
    /// Random bytes in a generated state value
    pub const STATE_BYTES: usize = 16;
}

/// Session cookie settings
pub mod session {
    /// Cookie carrying the session identifier
    pub const COOKIE_NAME: &str = "hr_session";
    /// Cookie lifetime in seconds
    pub const COOKIE_MAX_AGE_SECS: i64 = 8 * 60 * 60;
    /// Minimum spacing between sweeps of expired sessions
    pub const SWEEP_INTERVAL_SECS: i64 = 60;
}

/// Startup connectivity check
pub mod startup {
    /// Delay before the single database connectivity retry
    pub const DB_RETRY_DELAY_SECS: u64 = 5;
}
