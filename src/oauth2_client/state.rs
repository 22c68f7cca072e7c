// ABOUTME: Anti-forgery state generation for the OAuth2 authorization redirect
// ABOUTME: Produces random URL-safe values and compares them without early exit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use subtle::ConstantTimeEq;

use crate::constants::oauth::STATE_BYTES;

/// Generate a random state parameter for one authorization attempt
///
/// Returns a 22-character URL-safe string (16 random bytes, base64url).
#[must_use]
pub fn generate_state() -> String {
    let mut bytes = [0u8; STATE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare an expected state with the one echoed by the provider in constant time
#[must_use]
pub fn states_match(expected: &str, received: &str) -> bool {
    expected.as_bytes().ct_eq(received.as_bytes()).into()
}
