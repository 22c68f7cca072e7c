// ABOUTME: Configuration module root
// ABOUTME: Environment-only configuration for OAuth credentials, database, and HTTP server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment variable driven server configuration
pub mod environment;
