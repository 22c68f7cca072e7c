// ABOUTME: Authentication module covering browser sessions and the OAuth login flow
// ABOUTME: Keeps routes thin by owning state issuance, code exchange, and token refresh
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// OAuth login flow service
pub mod flow;
/// Per-browser session storage
pub mod session;

pub use flow::OAuthFlowService;
pub use session::{SessionStore, StateCheck};
