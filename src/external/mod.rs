// ABOUTME: External API clients module
// ABOUTME: Houses the HR API client used to fetch the signed-in user's record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// HR API client
pub mod hr_api_client;

pub use hr_api_client::HrApiClient;
