// ABOUTME: Security module for browser-facing protections
// ABOUTME: Hosts the session cookie helpers used by the login and fetch routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Secure HTTP cookie utilities
pub mod cookies;
