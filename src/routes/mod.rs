// ABOUTME: Route module organization for the HR sync server HTTP endpoints
// ABOUTME: Each domain module defines its routes and thin handlers delegating to services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the HR sync server
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to service layers.

use std::sync::Arc;

use axum::Router;

use crate::resources::ServerResources;

/// OAuth login, callback, and logout routes
pub mod auth;
/// Database health route
pub mod health;
/// Landing page route
pub mod home;
/// HTML page rendering
pub mod pages;
/// HR record fetch route
pub mod users;

pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use home::HomeRoutes;
pub use users::UserRoutes;

/// Assemble every route module into one router
pub fn router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HomeRoutes::routes(Arc::clone(resources)))
        .merge(AuthRoutes::routes(Arc::clone(resources)))
        .merge(UserRoutes::routes(Arc::clone(resources)))
        .merge(HealthRoutes::routes(Arc::clone(resources)))
}
