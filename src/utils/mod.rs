// ABOUTME: Utility module root for shared helpers
// ABOUTME: Currently hosts the outbound HTTP client factory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Outbound HTTP client construction
pub mod http_client;
