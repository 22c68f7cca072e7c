// ABOUTME: Secure HTTP cookie utilities for browser session tracking
// ABOUTME: Provides httpOnly, Secure, SameSite cookie helpers for the session identifier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Secure cookie utilities
//!
//! The only cookie this server issues carries the opaque session identifier.
//! `SameSite=Lax` lets it ride along on the provider's top-level redirect
//! back to `/callback`.

use std::fmt::Write;

use axum::http::{header, HeaderMap, HeaderValue};
use uuid::Uuid;

use crate::constants::session::{COOKIE_MAX_AGE_SECS, COOKIE_NAME};

/// Cookie security configuration
pub struct SecureCookieConfig {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Max-Age in seconds
    pub max_age_secs: i64,
    /// `HttpOnly` flag (prevents JavaScript access)
    pub http_only: bool,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// Cookie path
    pub path: String,
}

impl SecureCookieConfig {
    /// Create an `HttpOnly`, `SameSite=Lax` cookie scoped to `/`
    ///
    /// `secure` should be true whenever the server is reached over HTTPS.
    #[must_use]
    pub fn new(name: &str, value: String, max_age_secs: i64, secure: bool) -> Self {
        Self {
            name: name.to_owned(),
            value,
            max_age_secs,
            http_only: true,
            secure,
            path: "/".to_owned(),
        }
    }

    /// Build the Set-Cookie header value
    #[must_use]
    pub fn build(&self) -> String {
        let mut cookie = format!("{}={}", self.name, self.value);
        let _ = write!(cookie, "; Max-Age={}", self.max_age_secs);
        let _ = write!(cookie, "; Path={}", self.path);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }

        cookie.push_str("; SameSite=Lax");

        cookie
    }
}

/// Set the session cookie
pub fn set_session_cookie(headers: &mut HeaderMap, session_id: Uuid, secure: bool) {
    let cookie = SecureCookieConfig::new(
        COOKIE_NAME,
        session_id.to_string(),
        COOKIE_MAX_AGE_SECS,
        secure,
    );

    if let Ok(header_value) = HeaderValue::from_str(&cookie.build()) {
        headers.append(header::SET_COOKIE, header_value);
    }
}

/// Expire the session cookie
pub fn clear_session_cookie(headers: &mut HeaderMap, secure: bool) {
    let cookie = SecureCookieConfig::new(COOKIE_NAME, String::new(), 0, secure);

    if let Ok(header_value) = HeaderValue::from_str(&cookie.build()) {
        headers.append(header::SET_COOKIE, header_value);
    }
}

/// Extract cookie value from request headers
///
/// All `Cookie` headers are searched; the first matching name wins.
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            let value = parts.next()?.trim();

            if name == cookie_name {
                Some(value.to_owned())
            } else {
                None
            }
        })
}

/// Session identifier carried by the request, if present and well-formed
#[must_use]
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    get_cookie_value(headers, COOKIE_NAME).and_then(|value| Uuid::parse_str(&value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_flags() {
        let mut headers = HeaderMap::new();
        let id = Uuid::new_v4();
        set_session_cookie(&mut headers, id, true);

        let value = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(value.starts_with(&format!("{COOKIE_NAME}={id}")));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("Secure"));
        assert!(value.contains("SameSite=Lax"));
        assert!(value.contains("Path=/"));
    }

    #[test]
    fn test_plain_http_cookie_is_not_secure() {
        let mut headers = HeaderMap::new();
        clear_session_cookie(&mut headers, false);

        let value = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(value.contains("Max-Age=0"));
        assert!(!value.contains("Secure"));
    }

    #[test]
    fn test_session_id_parsing() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {COOKIE_NAME}={id}")).unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers), Some(id));

        let mut bogus = HeaderMap::new();
        bogus.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{COOKIE_NAME}=not-a-uuid")).unwrap(),
        );
        assert_eq!(session_id_from_headers(&bogus), None);
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }
}
