// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! EventsHub: campus events and team-matching backend.
//!
//! This crate provides the moderation workflow (submission, approval queue,
//! role-gated transitions), account sync against an external identity
//! provider, and a local-first deployment mode that mirrors the same state
//! machine without the provider.

pub mod config;
pub mod db;
pub mod error;
pub mod local;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::IdentityVerifier;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub identity_verifier: Arc<IdentityVerifier>,
}
